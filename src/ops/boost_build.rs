//! Implementation of `boost-ndk build`.
//!
//! Validation and configuration happen up front and abort on failure. The
//! per-architecture loop then attempts every architecture: a b2 run that
//! exits non-zero is recorded in the report and the loop moves on.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;

use crate::builder::b2::{ensure_bootstrapped, B2Invocation};
use crate::core::abi::{Arch, HostPlatform};
use crate::core::settings::BuildSettings;
use crate::core::version::{LibraryVersion, NdkRevision};
use crate::ops::boost_config::{write_user_config, Environment};
use crate::ops::boost_patch::{patch_for_mode, should_patch};
use crate::patch::PatchOutcome;
use crate::util::errors::Result;
use crate::util::shell::{Shell, Status};

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub ndk_root: PathBuf,
    pub boost_root: PathBuf,
    pub settings: BuildSettings,
    pub host: HostPlatform,
    /// Render configuration and commands without writing or running anything.
    pub dry_run: bool,
}

/// What happened to one architecture.
#[derive(Debug, Clone)]
pub struct ArchOutcome {
    pub arch: Arch,
    pub command: String,
    /// `None` in a dry run.
    pub status: Option<ExitStatus>,
    pub log: Option<PathBuf>,
    pub prefix: PathBuf,
}

impl ArchOutcome {
    pub fn failed(&self) -> bool {
        self.status.is_some_and(|status| !status.success())
    }
}

/// Summary of a build run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub ndk_revision: NdkRevision,
    pub library_version: LibraryVersion,
    pub user_config: PathBuf,
    /// Rendered `user-config.jam`.
    pub user_config_text: String,
    /// `None` when patching was skipped.
    pub patches: Option<Vec<PatchOutcome>>,
    pub archs: Vec<ArchOutcome>,
    pub dry_run: bool,
}

impl BuildReport {
    pub fn failures(&self) -> impl Iterator<Item = &ArchOutcome> {
        self.archs.iter().filter(|outcome| outcome.failed())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Validate, configure, patch, and run b2 once per architecture.
pub fn build(opts: &BuildOptions, shell: &Arc<Shell>) -> Result<BuildReport> {
    let settings = &opts.settings;

    shell.status(Status::Validating, "NDK and Boost sources");
    let env = Environment::validate(&opts.ndk_root, &opts.boost_root, settings.api_level(), opts.host)?;
    shell.note(format!(
        "NDK {} / Boost {} / API level {}",
        env.ndk.revision(),
        env.boost.version(),
        settings.api_level()
    ));

    let abis: Vec<&str> = settings.archs().iter().map(|arch| arch.abi()).collect();
    shell.status(Status::Configuring, format!("clang toolsets for {}", abis.join(", ")));
    let (user_config, user_config_path) = write_user_config(&env, settings, opts.dry_run)?;
    if !opts.dry_run {
        shell.status(Status::Wrote, user_config_path.display());
    }

    let patches = if opts.dry_run {
        if should_patch(settings.patch_mode(), env.boost.version()) {
            shell.status(Status::Patching, "would apply Android patches");
        }
        None
    } else {
        let patches = patch_for_mode(&env.boost, settings.patch_mode())?;
        if let Some(ref outcomes) = patches {
            for outcome in outcomes {
                let status = if outcome.fully_applied() {
                    Status::Patched
                } else {
                    Status::Skipped
                };
                shell.status(status, outcome.path.display());
            }
        }
        patches
    };

    let mut archs = Vec::with_capacity(settings.archs().len());
    let mut bootstrapped = false;
    let bar_len = if settings.log_to_file() {
        settings.archs().len() as u64
    } else {
        0
    };
    let mut progress = shell.progress(bar_len, "Building");

    for &arch in settings.archs() {
        let invocation = B2Invocation::new(&env.boost, env.host(), settings, arch);
        let command = invocation.display_command();

        if opts.dry_run {
            progress.println(shell, Status::Running, &command);
            archs.push(outcome(&invocation, command, None));
            continue;
        }

        if !bootstrapped {
            if !env.boost.driver(env.host()).exists() {
                progress.println(shell, Status::Bootstrapping, env.boost.root().display());
            }
            ensure_bootstrapped(&env.boost, env.host())?;
            bootstrapped = true;
        }

        progress.set_message(arch);
        let span = shell.span(Status::Building, arch);
        tracing::info!("{}", command);
        let status = invocation.run()?;

        if status.success() {
            span.finish_as(Status::Finished, arch);
        } else {
            tracing::warn!("b2 for {} exited with {}", arch, status);
            span.finish_as(Status::Warning, format!("{} failed ({})", arch, status));
        }
        progress.inc(1);
        archs.push(outcome(&invocation, command, Some(status)));
    }
    progress.finish();

    Ok(BuildReport {
        ndk_revision: env.ndk.revision().clone(),
        library_version: env.boost.version().clone(),
        user_config: user_config_path,
        user_config_text: user_config.render(),
        patches,
        archs,
        dry_run: opts.dry_run,
    })
}

fn outcome(invocation: &B2Invocation, command: String, status: Option<ExitStatus>) -> ArchOutcome {
    ArchOutcome {
        arch: invocation.arch(),
        command,
        status,
        log: invocation.log_path().map(PathBuf::from),
        prefix: invocation.prefix_dir().to_path_buf(),
    }
}
