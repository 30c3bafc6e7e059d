//! b2 driver invocations.
//!
//! One `B2Invocation` is built per architecture. The flag list is a pure
//! function of the validated settings, the Boost tree, and the arch.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::builder::boost::{BoostTree, TARGET_OS};
use crate::core::abi::{Arch, HostPlatform};
use crate::core::settings::{BuildSettings, LibrarySelection};
use crate::util::errors::Result;
use crate::util::process::ProcessBuilder;

/// Toolset family declared in `user-config.jam`.
pub const TOOLSET: &str = "clang";

/// A b2 run for one architecture.
#[derive(Debug, Clone)]
pub struct B2Invocation {
    arch: Arch,
    build_dir: PathBuf,
    prefix_dir: PathBuf,
    log: Option<PathBuf>,
    process: ProcessBuilder,
}

impl B2Invocation {
    pub fn new(tree: &BoostTree, host: HostPlatform, settings: &BuildSettings, arch: Arch) -> Self {
        let build_dir = tree.build_dir(arch);
        let prefix_dir = tree.prefix_dir(arch);
        let log = settings.log_to_file().then(|| tree.log_path(arch));

        let mut process = ProcessBuilder::new(tree.driver(host))
            .cwd(tree.root())
            .args(b2_args(settings, arch, &build_dir, &prefix_dir));
        if let Some(ref log) = log {
            process = process.log_to(log);
        }

        B2Invocation {
            arch,
            build_dir,
            prefix_dir,
            log,
            process,
        }
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn prefix_dir(&self) -> &Path {
        &self.prefix_dir
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log.as_deref()
    }

    pub fn args(&self) -> &[String] {
        self.process.get_args()
    }

    pub fn display_command(&self) -> String {
        self.process.display_command()
    }

    /// Run b2 to completion. A non-zero exit is returned, not raised.
    pub fn run(&self) -> Result<ExitStatus> {
        tracing::debug!("running: {}", self.display_command());
        self.process.status()
    }
}

/// The b2 argument list for one architecture.
pub fn b2_args(
    settings: &BuildSettings,
    arch: Arch,
    build_dir: &Path,
    prefix_dir: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-q".to_string(),
        "-d+2".to_string(),
        "--ignore-site-config".to_string(),
        format!("-j{}", settings.jobs()),
        format!("target-os={}", TARGET_OS),
        format!("toolset={}-{}", TOOLSET, arch.jam_tag()),
        format!("threading={}", settings.threading()),
        format!("link={}", settings.link()),
        format!("--layout={}", settings.layout()),
    ];

    match settings.library_selection() {
        LibrarySelection::Only(libs) => {
            args.extend(libs.iter().map(|lib| format!("--with-{}", lib)));
        }
        LibrarySelection::AllExcept(libs) => {
            args.extend(libs.iter().map(|lib| format!("--without-{}", lib)));
        }
    }

    args.push(format!("--build-dir={}", build_dir.display()));
    args.push(format!("--prefix={}", prefix_dir.display()));
    args.push("install".to_string());
    args.push("-a".to_string());
    args
}

/// Build the b2 driver if it is not present yet.
///
/// Returns `true` when the bootstrap script was run. A bootstrap that exits
/// non-zero is logged; the following b2 launch reports the missing driver.
pub fn ensure_bootstrapped(tree: &BoostTree, host: HostPlatform) -> Result<bool> {
    if tree.driver(host).exists() {
        return Ok(false);
    }

    let process = bootstrap_process(tree, host);
    tracing::info!("bootstrapping b2: {}", process.display_command());
    let status = process.status()?;
    if !status.success() {
        tracing::warn!("bootstrap exited with {}", status);
    }
    Ok(true)
}

/// The command that runs the bootstrap script from the Boost root.
pub fn bootstrap_process(tree: &BoostTree, host: HostPlatform) -> ProcessBuilder {
    let script = host.bootstrap_script();
    let process = match host {
        HostPlatform::Windows => ProcessBuilder::new("cmd").args(["/C", script]),
        HostPlatform::Linux | HostPlatform::Darwin => ProcessBuilder::new("sh").arg(script),
    };
    process.cwd(tree.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::BoostFixture;
    use crate::util::config::BuildConfig;

    fn settings(config: BuildConfig) -> BuildSettings {
        BuildSettings::from_config(&config).unwrap()
    }

    #[test]
    fn test_default_flags() {
        let boost = BoostFixture::new("1_80").create();
        let tree = BoostTree::validate(boost.path()).unwrap();
        let cfg = BuildConfig {
            jobs: Some(8),
            ..Default::default()
        };
        let inv = B2Invocation::new(&tree, HostPlatform::Linux, &settings(cfg), Arch::Arm64V8a);

        let args = inv.args();
        assert_eq!(
            &args[..9],
            &[
                "-q",
                "-d+2",
                "--ignore-site-config",
                "-j8",
                "target-os=android",
                "toolset=clang-arm64v8a",
                "threading=multi",
                "link=static",
                "--layout=system",
            ]
        );
        assert!(args.contains(&"--without-python".to_string()));
        assert!(args.contains(&"--without-graph_parallel".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--with-")));
        assert_eq!(&args[args.len() - 2..], &["install", "-a"]);

        let build_dir = format!("--build-dir={}", tree.build_dir(Arch::Arm64V8a).display());
        let prefix = format!("--prefix={}", tree.prefix_dir(Arch::Arm64V8a).display());
        assert!(args.contains(&build_dir));
        assert!(args.contains(&prefix));
        assert!(inv.log_path().is_none());
    }

    #[test]
    fn test_with_libs_only() {
        let boost = BoostFixture::new("1_80").create();
        let tree = BoostTree::validate(boost.path()).unwrap();
        let cfg = BuildConfig {
            with: vec!["system".into(), "thread".into()],
            link: Some(crate::core::settings::LinkMode::Shared),
            ..Default::default()
        };
        let inv = B2Invocation::new(&tree, HostPlatform::Linux, &settings(cfg), Arch::X86);

        let args = inv.args();
        assert!(args.contains(&"--with-system".to_string()));
        assert!(args.contains(&"--with-thread".to_string()));
        assert!(args.contains(&"link=shared".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--without-")));
    }

    #[test]
    fn test_log_path_when_enabled() {
        let boost = BoostFixture::new("1_80").create();
        let tree = BoostTree::validate(boost.path()).unwrap();
        let cfg = BuildConfig {
            log_to_file: Some(true),
            ..Default::default()
        };
        let inv = B2Invocation::new(&tree, HostPlatform::Linux, &settings(cfg), Arch::X86_64);

        assert_eq!(inv.log_path(), Some(tree.log_path(Arch::X86_64).as_path()));
        assert!(inv.display_command().ends_with("build_log_x86_64.txt\" 2>&1"));
    }

    #[test]
    fn test_existing_driver_skips_bootstrap() {
        let boost = BoostFixture::new("1_80").with_driver().create();
        let tree = BoostTree::validate(boost.path()).unwrap();
        assert!(!ensure_bootstrapped(&tree, HostPlatform::host()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_bootstrap_runs_once() {
        let boost = BoostFixture::new("1_80").with_bootstrap_script().create();
        let tree = BoostTree::validate(boost.path()).unwrap();

        assert!(ensure_bootstrapped(&tree, HostPlatform::Linux).unwrap());
        assert!(tree.driver(HostPlatform::Linux).exists());
        assert!(!ensure_bootstrapped(&tree, HostPlatform::Linux).unwrap());
    }
}
