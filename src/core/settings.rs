//! Validated build settings.
//!
//! `BuildSettings` is constructed once from the merged configuration and is
//! immutable afterwards. Collections passed to the driver are derived from
//! it on demand rather than edited in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::abi::Arch;
use crate::core::version::MIN_API_LEVEL;
use crate::util::config::BuildConfig;
use crate::util::errors::ConfigError;

/// Library that is never built: b2 would need a Python toolchain for Android.
pub const ALWAYS_EXCLUDED: &str = "python";

/// Libraries excluded when the configuration does not say otherwise.
///
/// Most of these have standard C++17 replacements; the rest are test or
/// graph tooling that is not useful on device.
pub const DEFAULT_EXCLUDED: &[&str] = &[
    "python",
    "atomic",
    "chrono",
    "date_time",
    "filesystem",
    "regex",
    "wave",
    "test",
    "graph",
    "graph_parallel",
];

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $key:literal, $expected:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// The keyword as passed to b2 or written in config files.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ConfigError::InvalidValue {
                        key: $key,
                        value: s.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

keyword_enum! {
    /// Library file naming scheme (`--layout`).
    Layout, "layout", "`system`, `tagged` or `versioned`" {
        System => "system",
        Tagged => "tagged",
        Versioned => "versioned",
    }
}

keyword_enum! {
    /// Library link mode (`link=`).
    LinkMode, "link", "`static` or `shared`" {
        Static => "static",
        Shared => "shared",
    }
}

keyword_enum! {
    /// Threading model (`threading=`).
    Threading, "threading", "`multi` or `single`" {
        Multi => "multi",
        Single => "single",
    }
}

keyword_enum! {
    /// When to apply the Android source patches.
    PatchMode, "patch", "`auto`, `always` or `never`" {
        Auto => "auto",
        Always => "always",
        Never => "never",
    }
}

/// How the b2 command selects libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySelection {
    /// Build only these libraries (`--with-<lib>`).
    Only(Vec<String>),
    /// Build everything except these (`--without-<lib>`).
    AllExcept(Vec<String>),
}

/// Immutable, validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    archs: Vec<Arch>,
    api_level: u32,
    with_libs: Vec<String>,
    without_libs: Vec<String>,
    log_to_file: bool,
    layout: Layout,
    link: LinkMode,
    threading: Threading,
    patch_mode: PatchMode,
    jobs: usize,
}

impl BuildSettings {
    /// Validate a merged configuration.
    pub fn from_config(config: &BuildConfig) -> Result<Self, ConfigError> {
        let archs = match &config.archs {
            Some(tags) => {
                let mut archs: Vec<Arch> = Vec::with_capacity(tags.len());
                for tag in tags {
                    let arch: Arch = tag.parse()?;
                    if !archs.contains(&arch) {
                        archs.push(arch);
                    }
                }
                archs
            }
            None => Arch::ALL.to_vec(),
        };
        if archs.is_empty() {
            return Err(ConfigError::NoArchitectures);
        }

        let with_libs = normalize_libs("with", &config.with)?;
        let without_libs = match &config.without {
            Some(libs) => {
                let libs = normalize_libs("without", libs)?;
                if let Some(lib) = with_libs.iter().find(|lib| libs.contains(lib)) {
                    return Err(ConfigError::ConflictingLibrary(lib.clone()));
                }
                libs
            }
            None => DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
        };

        let jobs = match config.jobs {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "jobs",
                    value: "0".to_string(),
                    expected: "a positive number",
                })
            }
            Some(jobs) => jobs,
            None => default_jobs(),
        };

        Ok(BuildSettings {
            archs,
            api_level: config.api_level.unwrap_or(MIN_API_LEVEL),
            with_libs,
            without_libs,
            log_to_file: config.log_to_file.unwrap_or(false),
            layout: config.layout.unwrap_or(Layout::System),
            link: config.link.unwrap_or(LinkMode::Static),
            threading: config.threading.unwrap_or(Threading::Multi),
            patch_mode: config.patch.unwrap_or(PatchMode::Auto),
            jobs,
        })
    }

    pub fn archs(&self) -> &[Arch] {
        &self.archs
    }

    pub fn api_level(&self) -> u32 {
        self.api_level
    }

    pub fn log_to_file(&self) -> bool {
        self.log_to_file
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn link(&self) -> LinkMode {
        self.link
    }

    pub fn threading(&self) -> Threading {
        self.threading
    }

    pub fn patch_mode(&self) -> PatchMode {
        self.patch_mode
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Libraries the driver is told about.
    ///
    /// b2 refuses to mix `--with-*` and `--without-*`, so an explicit
    /// inclusion list wins. The exclusion list always carries `python`.
    pub fn library_selection(&self) -> LibrarySelection {
        if !self.with_libs.is_empty() {
            return LibrarySelection::Only(self.with_libs.clone());
        }
        let mut excluded = self.without_libs.clone();
        if !excluded.iter().any(|lib| lib == ALWAYS_EXCLUDED) {
            excluded.push(ALWAYS_EXCLUDED.to_string());
        }
        LibrarySelection::AllExcept(excluded)
    }
}

/// Trim, drop empties and duplicates, and reject names b2 cannot take.
fn normalize_libs(key: &'static str, libs: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut out: Vec<String> = Vec::with_capacity(libs.len());
    for lib in libs {
        let lib = lib.trim();
        if lib.is_empty() {
            continue;
        }
        if lib.contains(char::is_whitespace) || lib.starts_with('-') {
            return Err(ConfigError::InvalidValue {
                key,
                value: lib.to_string(),
                expected: "a Boost library name such as `system`",
            });
        }
        if !out.iter().any(|seen| seen == lib) {
            out.push(lib.to_string());
        }
    }
    Ok(out)
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
