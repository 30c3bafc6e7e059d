//! Android ABI and host platform identities.
//!
//! The set of architectures is closed: every ABI tag maps to exactly one
//! clang target triple, binutils prefix, and b2 toolset tag. Unknown tags are
//! rejected rather than skipped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::errors::ConfigError;

/// A target Android ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Arch {
    /// 64-bit ARM (`arm64-v8a`)
    Arm64V8a,
    /// 32-bit ARM with Thumb-2 (`armeabi-v7a`)
    ArmeabiV7a,
    /// 32-bit x86 (`x86`)
    X86,
    /// 64-bit x86 (`x86_64`)
    X86_64,
}

impl Arch {
    /// All supported architectures, in the default build order.
    pub const ALL: [Arch; 4] = [Arch::Arm64V8a, Arch::ArmeabiV7a, Arch::X86, Arch::X86_64];

    /// The Android ABI tag (`arm64-v8a`, ...).
    pub fn abi(&self) -> &'static str {
        match self {
            Arch::Arm64V8a => "arm64-v8a",
            Arch::ArmeabiV7a => "armeabi-v7a",
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
        }
    }

    /// The clang target triple, without API level.
    pub fn clang_triple(&self) -> &'static str {
        match self {
            Arch::Arm64V8a => "aarch64-linux-android",
            Arch::ArmeabiV7a => "armv7a-linux-androideabi",
            Arch::X86 => "i686-linux-android",
            Arch::X86_64 => "x86_64-linux-android",
        }
    }

    /// The binutils prefix directory name inside the NDK `bin` directory.
    pub fn binutils_prefix(&self) -> &'static str {
        match self {
            Arch::Arm64V8a => "aarch64-linux-android",
            Arch::ArmeabiV7a => "arm-linux-androideabi",
            Arch::X86 => "i686-linux-android",
            Arch::X86_64 => "x86_64-linux-android",
        }
    }

    /// The b2 toolset tag. `user-config.jam` rejects `-` and `_` in it.
    pub fn jam_tag(&self) -> &'static str {
        match self {
            Arch::Arm64V8a => "arm64v8a",
            Arch::ArmeabiV7a => "armeabiv7a",
            Arch::X86 => "x86",
            Arch::X86_64 => "x8664",
        }
    }

    /// Extra compile flags beyond the shared set.
    pub fn extra_compile_flags(&self) -> &'static [&'static str] {
        match self {
            Arch::ArmeabiV7a => &["-mthumb"],
            Arch::Arm64V8a | Arch::X86 | Arch::X86_64 => &[],
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abi())
    }
}

impl FromStr for Arch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arch::ALL
            .into_iter()
            .find(|arch| arch.abi() == s)
            .ok_or_else(|| ConfigError::UnknownArch(s.to_string()))
    }
}

impl TryFrom<String> for Arch {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        arch.abi().to_string()
    }
}

/// The machine running the NDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    Linux,
    Darwin,
}

impl HostPlatform {
    /// Detect the host this binary runs on.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => HostPlatform::Windows,
            "macos" => HostPlatform::Darwin,
            _ => HostPlatform::Linux,
        }
    }

    /// NDK prebuilt directory name (`linux-x86_64`, ...).
    pub fn prebuilt_dir(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "windows-x86_64",
            HostPlatform::Linux => "linux-x86_64",
            HostPlatform::Darwin => "darwin-x86_64",
        }
    }

    /// Suffix appended to the triple-prefixed compiler driver.
    pub fn clang_driver(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "clang++.cmd",
            HostPlatform::Linux | HostPlatform::Darwin => "clang++",
        }
    }

    /// Archiver name, without the `llvm-` prefix.
    pub fn ar(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "ar.exe",
            HostPlatform::Linux | HostPlatform::Darwin => "ar",
        }
    }

    /// Ranlib name, without the `llvm-` prefix.
    pub fn ranlib(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "ranlib.exe",
            HostPlatform::Linux | HostPlatform::Darwin => "ranlib",
        }
    }

    /// Script that builds the b2 driver.
    pub fn bootstrap_script(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "bootstrap.bat",
            HostPlatform::Linux | HostPlatform::Darwin => "bootstrap.sh",
        }
    }

    /// File name of the b2 driver once bootstrapped.
    pub fn driver(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "b2.exe",
            HostPlatform::Linux | HostPlatform::Darwin => "b2",
        }
    }
}
