//! Implementation of `boost-ndk config`, and the environment validation every
//! other operation starts with.

use std::path::{Path, PathBuf};

use crate::builder::boost::BoostTree;
use crate::builder::ndk::NdkToolchain;
use crate::builder::user_config::UserConfig;
use crate::core::abi::HostPlatform;
use crate::core::settings::BuildSettings;
use crate::util::errors::Result;

/// A validated NDK and Boost tree.
#[derive(Debug, Clone)]
pub struct Environment {
    pub ndk: NdkToolchain,
    pub boost: BoostTree,
}

impl Environment {
    /// Validate the toolchain, then the library. Both must pass before
    /// anything is written.
    pub fn validate(
        ndk_root: &Path,
        boost_root: &Path,
        api_level: u32,
        host: HostPlatform,
    ) -> Result<Self> {
        let ndk = NdkToolchain::validate_for_host(ndk_root, api_level, host)?;
        let boost = BoostTree::validate(boost_root)?;
        Ok(Environment { ndk, boost })
    }

    pub fn host(&self) -> HostPlatform {
        self.ndk.host()
    }
}

/// Options for generating `user-config.jam`.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    pub ndk_root: PathBuf,
    pub boost_root: PathBuf,
    pub settings: BuildSettings,
    pub host: HostPlatform,
    /// Render without writing.
    pub dry_run: bool,
}

/// Result of generating `user-config.jam`.
#[derive(Debug, Clone)]
pub struct ConfigureResult {
    pub environment: Environment,
    pub user_config: UserConfig,
    pub path: PathBuf,
    pub written: bool,
}

/// Validate the environment and regenerate `user-config.jam`.
pub fn configure(opts: &ConfigureOptions) -> Result<ConfigureResult> {
    let environment = Environment::validate(
        &opts.ndk_root,
        &opts.boost_root,
        opts.settings.api_level(),
        opts.host,
    )?;
    let (user_config, path) = write_user_config(&environment, &opts.settings, opts.dry_run)?;

    Ok(ConfigureResult {
        environment,
        user_config,
        path,
        written: !opts.dry_run,
    })
}

/// Render `user-config.jam` for a validated environment, writing it unless
/// `dry_run` is set.
pub(crate) fn write_user_config(
    environment: &Environment,
    settings: &BuildSettings,
    dry_run: bool,
) -> Result<(UserConfig, PathBuf)> {
    let user_config = UserConfig::new(&environment.ndk, settings.api_level(), settings.archs())?;
    let path = environment.boost.user_config_path();
    if !dry_run {
        user_config.write(&environment.boost)?;
    }
    Ok((user_config, path))
}
