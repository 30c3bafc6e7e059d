//! Toolchain and library version extraction.
//!
//! The NDK records its revision in `source.properties` as
//! `Pkg.Revision = 24.0.8215888`; Boost records its library version in
//! `boost/version.hpp` as `#define BOOST_LIB_VERSION "1_80"`. Both are
//! compared as semantic versions so that `1.100` orders after `1.74`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

static PKG_REVISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*Pkg\.Revision\s*=\s*(\d+)\.(\d+)(?:\.(\d+))?").unwrap()
});

static BOOST_LIB_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#define\s+BOOST_LIB_VERSION\s+"(\d+)_(\d+)(?:_(\d+))?""#).unwrap()
});

/// Minimum supported NDK major revision.
pub const MIN_NDK_REVISION: u64 = 23;

/// Minimum supported platform API level (Android 8.0).
pub const MIN_API_LEVEL: u32 = 26;

/// Minimum supported Boost version.
pub const MIN_LIBRARY_VERSION: Version = Version::new(1, 74, 0);

/// Boost versions from this one on build for Android without source patches.
pub const UNPATCHED_LIBRARY_VERSION: Version = Version::new(1, 77, 0);

/// NDK revision from `source.properties`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NdkRevision(Version);

impl NdkRevision {
    /// Extract the revision from the text of `source.properties`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = PKG_REVISION.captures(text)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let build = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(NdkRevision(Version::new(major, minor, build)))
    }

    /// Major revision (the `24` in `24.0.8215888`).
    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn version(&self) -> &Version {
        &self.0
    }
}

impl fmt::Display for NdkRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Boost library version from `boost/version.hpp`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LibraryVersion(Version);

impl LibraryVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        LibraryVersion(Version::new(major, minor, patch))
    }

    /// Extract the version token from the text of `boost/version.hpp`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = BOOST_LIB_VERSION.captures(text)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(LibraryVersion::new(major, minor, patch))
    }

    pub fn version(&self) -> &Version {
        &self.0
    }

    /// Whether this release needs the Android source patches.
    pub fn needs_patches(&self) -> bool {
        self.0 < UNPATCHED_LIBRARY_VERSION
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
