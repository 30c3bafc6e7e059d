//! Toolchain description and b2 invocation.
//!
//! This module validates the NDK and Boost trees, renders
//! `user-config.jam`, and drives the b2 build per ABI.

pub mod b2;
pub mod boost;
pub mod ndk;
pub mod user_config;

pub use b2::B2Invocation;
pub use boost::BoostTree;
pub use ndk::NdkToolchain;
pub use user_config::UserConfig;
