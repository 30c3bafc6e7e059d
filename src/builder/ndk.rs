//! Android NDK discovery and validation.
//!
//! An NDK root is accepted when its `source.properties` carries a
//! `Pkg.Revision` of at least r23. Compiler paths are derived from the LLVM
//! prebuilt directory for the host, e.g.
//! `<root>/toolchains/llvm/prebuilt/linux-x86_64/bin/aarch64-linux-android26-clang++`.

use std::path::{Path, PathBuf};

use crate::core::abi::{Arch, HostPlatform};
use crate::core::version::{NdkRevision, MIN_API_LEVEL, MIN_NDK_REVISION};
use crate::util::errors::{ConfigError, Result};

/// Name of the NDK metadata file.
pub const SOURCE_PROPERTIES: &str = "source.properties";

/// A validated Android NDK.
#[derive(Debug, Clone)]
pub struct NdkToolchain {
    root: PathBuf,
    revision: NdkRevision,
    host: HostPlatform,
}

impl NdkToolchain {
    /// Validate the NDK at `root` for the current host.
    pub fn validate(root: &Path, api_level: u32) -> Result<Self> {
        Self::validate_for_host(root, api_level, HostPlatform::host())
    }

    /// Validate the NDK at `root` for an explicit host.
    pub fn validate_for_host(root: &Path, api_level: u32, host: HostPlatform) -> Result<Self> {
        let revision = validate_toolchain(root, api_level)?;
        Ok(NdkToolchain {
            root: root.to_path_buf(),
            revision,
            host,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn revision(&self) -> &NdkRevision {
        &self.revision
    }

    pub fn host(&self) -> HostPlatform {
        self.host
    }
}

/// LLVM `bin` directory of an NDK root for `host`.
pub fn bin_dir(root: &Path, host: HostPlatform) -> PathBuf {
    root.join("toolchains")
        .join("llvm")
        .join("prebuilt")
        .join(host.prebuilt_dir())
        .join("bin")
}

/// Compiler driver of an NDK root, e.g.
/// `.../bin/aarch64-linux-android26-clang++`.
pub fn compiler_path(root: &Path, host: HostPlatform, arch: Arch, api_level: u32) -> PathBuf {
    bin_dir(root, host).join(format!(
        "{}{}-{}",
        arch.clang_triple(),
        api_level,
        host.clang_driver()
    ))
}

pub fn binutils_prefix_path(root: &Path, host: HostPlatform, arch: Arch) -> PathBuf {
    bin_dir(root, host).join(arch.binutils_prefix())
}

/// Check the NDK revision and the requested platform API level.
pub fn validate_toolchain(root: &Path, api_level: u32) -> Result<NdkRevision> {
    let path = root.join(SOURCE_PROPERTIES);
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable {
        path: path.clone(),
        source,
    })?;

    let revision = NdkRevision::parse(&text).ok_or_else(|| ConfigError::MissingField {
        path: path.clone(),
        field: "Pkg.Revision",
    })?;
    tracing::debug!("NDK revision {} at {}", revision, root.display());

    if revision.major() < MIN_NDK_REVISION {
        return Err(ConfigError::NdkTooOld {
            found: revision.to_string(),
            required: MIN_NDK_REVISION,
        }
        .into());
    }

    if api_level < MIN_API_LEVEL {
        return Err(ConfigError::ApiLevelTooLow {
            found: api_level,
            required: MIN_API_LEVEL,
        }
        .into());
    }

    Ok(revision)
}
