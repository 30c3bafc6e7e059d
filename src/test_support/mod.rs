//! Test utilities for boost-ndk unit tests.
//!
//! ```rust,ignore
//! use boost_ndk::test_support::{BoostFixture, NdkFixture};
//!
//! #[test]
//! fn test_example() {
//!     let ndk = NdkFixture::new("25.2.9519653").create();
//!     let boost = BoostFixture::new("1_76").with_patch_targets().create();
//!     // ndk.path() and boost.path() are removed when dropped.
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;

use std::path::Path;

use crate::util::config::BuildConfig;

/// A `BuildConfig` for `archs` that runs single-job builds.
pub fn build_config(archs: &[&str]) -> BuildConfig {
    BuildConfig {
        archs: Some(archs.iter().map(|a| a.to_string()).collect()),
        jobs: Some(1),
        ..Default::default()
    }
}

/// Read a file a test expects to exist.
pub fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.as_ref().display(), e))
}
