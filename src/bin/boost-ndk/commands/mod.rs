//! Command implementations

pub mod build;
pub mod check;
pub mod completions;
pub mod config;
pub mod patch;
pub mod restore;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use boost_ndk::core::abi::HostPlatform;
use boost_ndk::core::settings::BuildSettings;
use boost_ndk::util::config::{
    global_config_path, load_config, BuildConfig, Config, PROJECT_CONFIG_FILE,
};
use boost_ndk::util::diagnostic::suggestions;
use boost_ndk::util::errors::Error;
use boost_ndk::util::shell::Shell;

use crate::cli::Cli;

/// State shared by every command: the shell, merged configuration and roots.
pub struct Context {
    pub shell: Arc<Shell>,
    pub config: Config,
    pub host: HostPlatform,
    pub verbose: bool,
}

impl Context {
    /// Load global and project config, then layer the root flags on top.
    pub fn new(cli: &Cli) -> Result<Self> {
        let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, cli.color));

        let project = match cli.config {
            Some(ref path) => path.clone(),
            None => std::env::current_dir()
                .context("failed to read current directory")?
                .join(PROJECT_CONFIG_FILE),
        };
        if cli.config.is_some() && !project.exists() {
            bail!("config file {} not found", project.display());
        }
        let mut config =
            load_config(global_config_path().as_deref(), &project).map_err(Error::from)?;

        if cli.ndk_root.is_some() {
            config.paths.ndk_root = cli.ndk_root.clone();
        }
        if cli.boost_root.is_some() {
            config.paths.boost_root = cli.boost_root.clone();
        }

        Ok(Context {
            shell,
            config,
            host: HostPlatform::host(),
            verbose: cli.verbose,
        })
    }

    pub fn ndk_root(&self) -> Result<PathBuf> {
        match self.config.paths.ndk_root {
            Some(ref root) => Ok(root.clone()),
            None => bail!("no NDK root given\nhelp: {}", suggestions::SET_ROOTS),
        }
    }

    pub fn boost_root(&self) -> Result<PathBuf> {
        match self.config.paths.boost_root {
            Some(ref root) => Ok(root.clone()),
            None => bail!("no Boost root given\nhelp: {}", suggestions::SET_ROOTS),
        }
    }

    /// Validate the config's build section with `overrides` layered on top.
    pub fn settings(&self, overrides: BuildConfig) -> Result<BuildSettings> {
        let mut config = self.config.clone();
        config.merge(Config {
            build: overrides,
            ..Default::default()
        });
        Ok(BuildSettings::from_config(&config.build).map_err(Error::from)?)
    }
}
