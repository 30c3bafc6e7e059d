//! Core data structures for boost-ndk.
//!
//! - Android ABIs and host platforms
//! - NDK and Boost version parsing
//! - Validated build settings

pub mod abi;
pub mod settings;
pub mod version;

pub use abi::{Arch, HostPlatform};
pub use settings::{BuildSettings, LibrarySelection};
pub use version::{LibraryVersion, NdkRevision};
