//! High-level operations.
//!
//! This module contains the implementation of boost-ndk commands.

pub mod boost_build;
pub mod boost_config;
pub mod boost_patch;
pub mod check;

pub use boost_build::{build, ArchOutcome, BuildOptions, BuildReport};
pub use boost_config::{configure, ConfigureOptions, ConfigureResult, Environment};
pub use boost_patch::{apply_patches, restore_sources, should_patch};
pub use check::{check, format_report, CheckOptions, CheckReport, CheckResult};
