//! boost-ndk - Cross-compile Boost for Android with the NDK and b2
//!
//! This crate provides the library behind the `boost-ndk` CLI: toolchain
//! validation, `user-config.jam` generation, reversible source patching,
//! and sequencing of per-ABI b2 runs.

pub mod builder;
pub mod core;
pub mod ops;
pub mod patch;
pub mod util;

/// Fixtures for unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// generates fake NDK and Boost trees in temporary directories.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{BoostTree, NdkToolchain, UserConfig};
pub use crate::core::{Arch, BuildSettings, HostPlatform};
pub use crate::patch::PatchManager;
pub use crate::util::errors::{Error, Result};
