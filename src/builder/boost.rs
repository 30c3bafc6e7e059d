//! Boost source tree layout and version validation.

use std::path::{Path, PathBuf};

use crate::core::abi::{Arch, HostPlatform};
use crate::core::version::{LibraryVersion, MIN_LIBRARY_VERSION};
use crate::util::errors::{ConfigError, Result};

/// Header that defines `BOOST_LIB_VERSION`, relative to the Boost root.
pub const VERSION_HEADER: &[&str] = &["boost", "version.hpp"];

/// Generated toolchain file, relative to the Boost root.
pub const USER_CONFIG: &[&str] = &["tools", "build", "src", "user-config.jam"];

/// Target OS passed to b2; also names the output directories.
pub const TARGET_OS: &str = "android";

/// A validated Boost source tree.
#[derive(Debug, Clone)]
pub struct BoostTree {
    root: PathBuf,
    version: LibraryVersion,
}

impl BoostTree {
    /// Validate the Boost sources at `root`.
    pub fn validate(root: &Path) -> Result<Self> {
        let version = validate_library_version(root)?;
        Ok(BoostTree {
            root: root.to_path_buf(),
            version,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> &LibraryVersion {
        &self.version
    }

    /// Location of the generated `user-config.jam`.
    pub fn user_config_path(&self) -> PathBuf {
        join_all(&self.root, USER_CONFIG)
    }

    /// The b2 executable, present once bootstrapped.
    pub fn driver(&self, host: HostPlatform) -> PathBuf {
        self.root.join(host.driver())
    }

    /// The bootstrap script that builds b2.
    pub fn bootstrap_script(&self, host: HostPlatform) -> PathBuf {
        self.root.join(host.bootstrap_script())
    }

    /// Intermediate build directory for `arch` (`android_build_tmp/<abi>`).
    pub fn build_dir(&self, arch: Arch) -> PathBuf {
        self.root
            .join(format!("{}_build_tmp", TARGET_OS))
            .join(arch.abi())
    }

    /// Install prefix for `arch` (`android/<abi>`).
    pub fn prefix_dir(&self, arch: Arch) -> PathBuf {
        self.root.join(TARGET_OS).join(arch.abi())
    }

    /// Per-arch build log (`build_log_<abi>.txt`).
    pub fn log_path(&self, arch: Arch) -> PathBuf {
        self.root.join(format!("build_log_{}.txt", arch.abi()))
    }
}

pub(crate) fn join_all(root: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Check that `root` is a Boost tree of a supported version.
pub fn validate_library_version(root: &Path) -> Result<LibraryVersion> {
    let path = join_all(root, VERSION_HEADER);
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable {
        path: path.clone(),
        source,
    })?;

    let version = LibraryVersion::parse(&text)
        .ok_or_else(|| ConfigError::NotALibraryRoot { path: path.clone() })?;
    tracing::debug!("Boost {} at {}", version, root.display());

    if version.version() < &MIN_LIBRARY_VERSION {
        return Err(ConfigError::LibraryTooOld {
            found: version.to_string(),
            required: MIN_LIBRARY_VERSION.to_string(),
        }
        .into());
    }

    Ok(version)
}
