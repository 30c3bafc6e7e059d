//! Environment checks for `boost-ndk check`.
//!
//! ## Checks Performed
//!
//! - NDK revision (r23 or newer)
//! - API level (26 or newer)
//! - Boost version (1.74 or newer) and whether it needs patches
//! - Per-architecture compiler drivers in the NDK
//! - b2 driver, or a bootstrap script that can build it
//! - Leftover `.src_bakup` backups

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::builder::boost::BoostTree;
use crate::builder::ndk::{compiler_path, validate_toolchain};
use crate::core::abi::{Arch, HostPlatform};
use crate::core::version::MIN_API_LEVEL;
use crate::patch::backup_path;
use crate::patch::catalog::catalog_targets;
use crate::util::diagnostic::suggestions;
use crate::util::process::find_executable;

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path involved (if applicable)
    pub path: Option<PathBuf>,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            required: true,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Summary of all checks.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub checks: Vec<CheckResult>,
    pub total_duration: Duration,
}

impl CheckReport {
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }

    /// Look up a check by name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Options for the check command.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub ndk_root: Option<PathBuf>,
    pub boost_root: Option<PathBuf>,
    pub api_level: u32,
    pub archs: Vec<Arch>,
    pub host: HostPlatform,
}

/// Run every check. Failures are recorded, never raised.
pub fn check(opts: &CheckOptions) -> CheckReport {
    let start = Instant::now();
    let mut report = CheckReport::default();

    match opts.ndk_root {
        Some(ref root) => {
            report.add(check_ndk(root));
            for &arch in &opts.archs {
                report.add(check_compiler(root, opts.host, opts.api_level, arch));
            }
        }
        None => report.add(CheckResult::fail("NDK", suggestions::SET_ROOTS)),
    }

    report.add(check_api_level(opts.api_level));

    match opts.boost_root {
        Some(ref root) => {
            report.add(check_boost(root));
            report.add(check_driver(root, opts.host));
            report.add(check_backups(root));
        }
        None => report.add(CheckResult::fail("Boost", suggestions::SET_ROOTS)),
    }

    report.total_duration = start.elapsed();
    report
}

fn check_ndk(root: &Path) -> CheckResult {
    // The API level is checked on its own.
    match validate_toolchain(root, MIN_API_LEVEL) {
        Ok(revision) => CheckResult::pass("NDK", format!("revision {}", revision)).with_path(root),
        Err(e) => CheckResult::fail("NDK", error_chain(&e)).with_path(root),
    }
}

fn check_api_level(api_level: u32) -> CheckResult {
    if api_level >= MIN_API_LEVEL {
        CheckResult::pass("API level", format!("android-{}", api_level))
    } else {
        CheckResult::fail(
            "API level",
            format!("android-{} is below the minimum of {}", api_level, MIN_API_LEVEL),
        )
    }
}

fn check_compiler(root: &Path, host: HostPlatform, api_level: u32, arch: Arch) -> CheckResult {
    let compiler = compiler_path(root, host, arch, api_level);
    let name = format!("Compiler ({})", arch);
    if compiler.exists() {
        CheckResult::pass(name, "found").with_path(compiler).optional()
    } else {
        CheckResult::fail(name, "not found; check the host prebuilt directory")
            .with_path(compiler)
            .optional()
    }
}

fn check_boost(root: &Path) -> CheckResult {
    match BoostTree::validate(root) {
        Ok(tree) => {
            let message = if tree.version().needs_patches() {
                format!("{} (Android patches will be applied)", tree.version())
            } else {
                tree.version().to_string()
            };
            CheckResult::pass("Boost", message).with_path(root)
        }
        Err(e) => CheckResult::fail("Boost", error_chain(&e)).with_path(root),
    }
}

fn check_driver(root: &Path, host: HostPlatform) -> CheckResult {
    let driver = root.join(host.driver());
    if driver.exists() {
        return CheckResult::pass("b2", "driver present").with_path(driver);
    }

    let script = root.join(host.bootstrap_script());
    if !script.exists() {
        return CheckResult::fail("b2", suggestions::DRIVER_MISSING).with_path(script);
    }

    let shell = match host {
        HostPlatform::Windows => "cmd",
        HostPlatform::Linux | HostPlatform::Darwin => "sh",
    };
    match find_executable(shell) {
        Some(_) => CheckResult::pass("b2", "will be bootstrapped on first build").with_path(script),
        None => CheckResult::fail("b2", format!("`{}` not found to run {}", shell, script.display())),
    }
}

fn check_backups(root: &Path) -> CheckResult {
    let backups: Vec<PathBuf> = catalog_targets(root)
        .iter()
        .map(|path| backup_path(path))
        .filter(|backup| backup.exists())
        .collect();

    if backups.is_empty() {
        CheckResult::pass("Backups", "sources untouched").optional()
    } else {
        CheckResult::pass(
            "Backups",
            format!(
                "{} patched file(s) have backups; `boost-ndk restore` reverts them",
                backups.len()
            ),
        )
        .optional()
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Format the report for display.
pub fn format_report(report: &CheckReport, verbose: bool) -> String {
    let mut output = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut output, report, verbose);
    output
}

fn write_report(out: &mut String, report: &CheckReport, verbose: bool) -> std::fmt::Result {
    use std::fmt::Write;

    writeln!(out, "boost-ndk check")?;
    writeln!(out, "===============\n")?;

    writeln!(out, "Checks:")?;
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };
        writeln!(out, "  {} {}{}: {}", status, check.name, required, check.message)?;
        if verbose {
            if let Some(path) = &check.path {
                writeln!(out, "      Path: {}", path.display())?;
            }
        }
    }
    writeln!(out)?;

    let failed = report.failed_count();
    let required_failed = report.required_failed_count();
    writeln!(
        out,
        "Summary: {} passed, {} failed",
        report.passed_count(),
        failed
    )?;
    if verbose {
        writeln!(out, "Checked in {:.2}s", report.total_duration.as_secs_f64())?;
    }

    if required_failed > 0 {
        writeln!(
            out,
            "\n{} required check(s) failed. Builds will not start.",
            required_failed
        )?;
    } else if failed > 0 {
        writeln!(
            out,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        )?;
    } else {
        writeln!(out, "\nAll checks passed.")?;
    }
    Ok(())
}
