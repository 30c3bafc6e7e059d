//! Error taxonomy for toolchain validation, patching, and driver launches.
//!
//! `Config` and `Format` errors mean the environment is wrong and abort the
//! run before any architecture is built. `Process` is reserved for a driver
//! that cannot be launched at all; a driver that runs and exits non-zero is
//! not an error.

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error kind.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("failed to launch `{program}`")]
    Process {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Invalid environment or configuration.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("cannot read {}", path.display())]
    #[diagnostic(code(boost_ndk::config::unreadable))]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{field}` not found in {}", path.display())]
    #[diagnostic(
        code(boost_ndk::config::missing_field),
        help("Check that --ndk-root points at an unpacked NDK")
    )]
    MissingField { path: PathBuf, field: &'static str },

    #[error("NDK revision {found} is not supported; revision {required} or newer is required")]
    #[diagnostic(
        code(boost_ndk::config::ndk_too_old),
        help("Install a newer NDK with `sdkmanager \"ndk;<version>\"`")
    )]
    NdkTooOld { found: String, required: u64 },

    #[error("platform API level {found} is below the minimum of {required}")]
    #[diagnostic(
        code(boost_ndk::config::api_level),
        help("Pass --api-level 26 or higher")
    )]
    ApiLevelTooLow { found: u32, required: u32 },

    #[error("no BOOST_LIB_VERSION in {}", path.display())]
    #[diagnostic(
        code(boost_ndk::config::not_a_library_root),
        help("The Boost root is likely wrong; it must contain boost/version.hpp")
    )]
    NotALibraryRoot { path: PathBuf },

    #[error("Boost {found} is not supported; {required} or newer is required")]
    #[diagnostic(code(boost_ndk::config::library_too_old))]
    LibraryTooOld { found: String, required: String },

    #[error("unknown architecture `{0}`")]
    #[diagnostic(
        code(boost_ndk::config::unknown_arch),
        help("Expected one of: arm64-v8a, armeabi-v7a, x86, x86_64")
    )]
    UnknownArch(String),

    #[error("no target architectures requested")]
    #[diagnostic(code(boost_ndk::config::no_arch))]
    NoArchitectures,

    #[error("library `{0}` is listed in both `with` and `without`")]
    #[diagnostic(code(boost_ndk::config::conflicting_library))]
    ConflictingLibrary(String),

    #[error("invalid value `{value}` for `{key}`; expected {expected}")]
    #[diagnostic(code(boost_ndk::config::invalid_value))]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to parse config file {}", path.display())]
    #[diagnostic(code(boost_ndk::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Source text that does not have the expected shape.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("`{anchor}` not found in {}", path.display())]
    AnchorNotFound { path: PathBuf, anchor: String },

    #[error("cannot determine the line ending of {}: line {line:?} has no terminator", path.display())]
    UnterminatedLine { path: PathBuf, line: String },
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Config(err) => {
                let mut diag = Diagnostic::error(err.to_string());
                if let Some(code) = MietteDiagnostic::code(err) {
                    diag = diag.with_context(format!("code: {}", code));
                }
                if let Some(help) = MietteDiagnostic::help(err) {
                    diag = diag.with_suggestion(help.to_string());
                }
                match err {
                    ConfigError::Unreadable { path, .. }
                    | ConfigError::MissingField { path, .. }
                    | ConfigError::NotALibraryRoot { path }
                    | ConfigError::Parse { path, .. } => diag.with_location(path),
                    _ => diag,
                }
            }
            Error::Format(err) => {
                let path = match err {
                    FormatError::AnchorNotFound { path, .. }
                    | FormatError::UnterminatedLine { path, .. } => path,
                };
                Diagnostic::error(err.to_string())
                    .with_location(path)
                    .with_suggestion(suggestions::RESTORE_SOURCES)
            }
            Error::Process { program, source } => {
                Diagnostic::error(format!("failed to launch `{}`", program))
                    .with_context(source.to_string())
                    .with_suggestion(suggestions::DRIVER_MISSING)
            }
            Error::Io { path, source } => Diagnostic::error(source.to_string()).with_location(path),
        }
    }
}
