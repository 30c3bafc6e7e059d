//! Configuration file support.
//!
//! boost-ndk reads two configuration file locations:
//! - Global: `~/.boost-ndk/config.toml` - User-wide defaults
//! - Project: `boost-ndk.toml` in the working directory (or `--config`)
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::settings::{Layout, LinkMode, PatchMode, Threading};
use crate::util::errors::ConfigError;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "boost-ndk.toml";

/// boost-ndk configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain and library locations
    pub paths: PathsConfig,

    /// Build settings
    pub build: BuildConfig,
}

/// Locations of the NDK and the Boost sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Android NDK root (the directory holding `source.properties`)
    pub ndk_root: Option<PathBuf>,

    /// Boost source root (the directory holding `boost/version.hpp`)
    pub boost_root: Option<PathBuf>,
}

/// Build-related configuration. Unset fields fall back to defaults when
/// validated into `BuildSettings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Android ABIs to build (e.g. `["arm64-v8a", "x86_64"]`)
    pub archs: Option<Vec<String>>,

    /// Minimum platform API level the libraries target
    pub api_level: Option<u32>,

    /// Libraries to build exclusively (`--with-<lib>`)
    #[serde(default)]
    pub with: Vec<String>,

    /// Libraries to skip (`--without-<lib>`)
    pub without: Option<Vec<String>>,

    /// Capture each architecture's driver output to `build_log_<abi>.txt`
    pub log_to_file: Option<bool>,

    /// Library naming layout
    pub layout: Option<Layout>,

    /// Static or shared libraries
    pub link: Option<LinkMode>,

    /// Threading model
    pub threading: Option<Threading>,

    /// When to apply source patches
    pub patch: Option<PatchMode>,

    /// Parallel jobs passed to the driver (None = host CPU count)
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, treating a missing file as empty. A file that
    /// exists but does not parse is still an error.
    pub fn load_if_exists(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.paths.ndk_root.is_some() {
            self.paths.ndk_root = other.paths.ndk_root;
        }
        if other.paths.boost_root.is_some() {
            self.paths.boost_root = other.paths.boost_root;
        }

        let build = other.build;
        if build.archs.is_some() {
            self.build.archs = build.archs;
        }
        if build.api_level.is_some() {
            self.build.api_level = build.api_level;
        }
        if !build.with.is_empty() {
            self.build.with = build.with;
        }
        if build.without.is_some() {
            self.build.without = build.without;
        }
        if build.log_to_file.is_some() {
            self.build.log_to_file = build.log_to_file;
        }
        if build.layout.is_some() {
            self.build.layout = build.layout;
        }
        if build.link.is_some() {
            self.build.link = build.link;
        }
        if build.threading.is_some() {
            self.build.threading = build.threading;
        }
        if build.patch.is_some() {
            self.build.patch = build.patch;
        }
        if build.jobs.is_some() {
            self.build.jobs = build.jobs;
        }
    }
}

/// Get the global boost-ndk config directory (~/.boost-ndk).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".boost-ndk"))
}

/// Get the global config path (~/.boost-ndk/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`boost-ndk.toml` or `--config`)
/// 2. Global config (~/.boost-ndk/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_if_exists(global_path)?);
    }

    config.merge(Config::load_if_exists(project_path)?);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.paths.ndk_root.is_none());
        assert!(config.build.archs.is_none());
        assert!(config.build.with.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("boost-ndk.toml");

        std::fs::write(
            &config_path,
            r#"
[paths]
ndk_root = "/opt/android-ndk-r25c"

[build]
archs = ["arm64-v8a", "x86_64"]
api_level = 28
without = ["python", "test"]
log_to_file = true
layout = "tagged"
link = "shared"
patch = "never"
jobs = 8
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(
            config.paths.ndk_root,
            Some(PathBuf::from("/opt/android-ndk-r25c"))
        );
        assert_eq!(
            config.build.archs,
            Some(vec!["arm64-v8a".to_string(), "x86_64".to_string()])
        );
        assert_eq!(config.build.api_level, Some(28));
        assert_eq!(config.build.log_to_file, Some(true));
        assert_eq!(config.build.layout, Some(Layout::Tagged));
        assert_eq!(config.build.link, Some(LinkMode::Shared));
        assert_eq!(config.build.patch, Some(PatchMode::Never));
        assert_eq!(config.build.jobs, Some(8));
    }

    #[test]
    fn test_config_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("boost-ndk.toml");
        std::fs::write(&config_path, "[build]\nlayout = \"flat\"\n").unwrap();

        let err = Config::load(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.api_level = Some(26);
        base.build.jobs = Some(4);

        let mut override_cfg = Config::default();
        override_cfg.build.api_level = Some(30);

        base.merge(override_cfg);

        assert_eq!(base.build.api_level, Some(30));
        assert_eq!(base.build.jobs, Some(4));
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("boost-ndk.toml");

        std::fs::write(&global, "[build]\napi_level = 27\njobs = 2\n").unwrap();
        std::fs::write(&project, "[build]\napi_level = 29\n").unwrap();

        let config = load_config(Some(&global), &project).unwrap();
        assert_eq!(config.build.api_level, Some(29));
        assert_eq!(config.build.jobs, Some(2));
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
