//! CLI integration tests for boost-ndk.
//!
//! These tests run the binary against fake NDK and Boost trees. No test
//! launches a real b2.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const PATH_CPP: &str = "#include <boost/filesystem/path.hpp>
# include <windows.h>
#elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\
 || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__)
# include <boost/filesystem/detail/utf8_codecvt_facet.hpp>
#endif
# elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\
  || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__)
    // \"All BSD system functions expect their string parameters to be in UTF-8 encoding
";

/// Get the boost-ndk binary command, isolated from the caller's environment.
fn boost_ndk(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("boost-ndk").unwrap();
    cmd.env_remove("ANDROID_NDK_ROOT")
        .env_remove("BOOST_ROOT")
        .env("HOME", home)
        .current_dir(home);
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A scratch directory holding `ndk/` and `boost/` trees.
struct Env {
    tmp: TempDir,
}

impl Env {
    fn new(ndk_revision: &str, boost_token: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "ndk/source.properties",
            &format!("Pkg.Desc = Android NDK\nPkg.Revision = {}\n", ndk_revision),
        );
        write(
            tmp.path(),
            "boost/boost/version.hpp",
            &format!("#define BOOST_LIB_VERSION \"{}\"\n", boost_token),
        );
        Env { tmp }
    }

    fn home(&self) -> &Path {
        self.tmp.path()
    }

    fn ndk(&self) -> std::path::PathBuf {
        self.tmp.path().join("ndk")
    }

    fn boost(&self) -> std::path::PathBuf {
        self.tmp.path().join("boost")
    }

    fn user_config(&self) -> std::path::PathBuf {
        self.boost().join("tools/build/src/user-config.jam")
    }

    /// Command with both roots passed as flags.
    fn cmd(&self) -> Command {
        let mut cmd = boost_ndk(self.home());
        cmd.arg("--ndk-root")
            .arg(self.ndk())
            .arg("--boost-root")
            .arg(self.boost());
        cmd
    }
}

// ============================================================================
// boost-ndk config
// ============================================================================

#[test]
fn test_config_print_two_archs() {
    let env = Env::new("24.0.8215888", "1_80");

    env.cmd()
        .args(["config", "--print", "--arch", "arm64-v8a", "--arch", "x86_64"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("import os ;"))
        .stdout(predicate::str::contains("using clang : arm64v8a"))
        .stdout(predicate::str::contains("using clang : x8664"))
        .stdout(predicate::str::contains("aarch64-linux-android26-clang++"))
        .stdout(predicate::str::contains("using clang : x86\n").not());

    assert!(!env.user_config().exists());
}

#[test]
fn test_config_writes_user_config() {
    let env = Env::new("25.2.9519653", "1_80");

    env.cmd()
        .args(["config", "--arch", "armeabi-v7a", "--api-level", "28"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let jam = fs::read_to_string(env.user_config()).unwrap();
    assert!(jam.contains("armv7a-linux-androideabi28-clang++"));
    assert!(jam.contains("<compileflags>-mthumb"));
}

#[test]
fn test_config_file_is_read() {
    let env = Env::new("25.2.9519653", "1_80");
    write(
        env.home(),
        "boost-ndk.toml",
        &format!(
            "[paths]\nndk_root = {:?}\nboost_root = {:?}\n\n[build]\narchs = [\"x86\"]\n",
            env.ndk().display().to_string(),
            env.boost().display().to_string()
        ),
    );

    boost_ndk(env.home())
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("using clang : x86\n"))
        .stdout(predicate::str::contains("arm64v8a").not());
}

#[test]
fn test_old_ndk_is_rejected() {
    let env = Env::new("22.1.7171670", "1_80");

    env.cmd()
        .args(["config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NDK revision 22.1.7171670 is not supported"));

    assert!(!env.user_config().exists());
}

#[test]
fn test_old_boost_is_rejected() {
    let env = Env::new("25.2.9519653", "1_73");

    env.cmd()
        .args(["config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Boost 1.73.0 is not supported"));
}

#[test]
fn test_wrong_boost_root() {
    let env = Env::new("25.2.9519653", "1_80");

    boost_ndk(env.home())
        .arg("--ndk-root")
        .arg(env.ndk())
        .arg("--boost-root")
        .arg(env.ndk())
        .args(["config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("version.hpp"));
}

#[test]
fn test_unknown_arch() {
    let env = Env::new("25.2.9519653", "1_80");

    env.cmd()
        .args(["config", "--arch", "mips"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown architecture `mips`"));
}

#[test]
fn test_roots_from_environment() {
    let env = Env::new("25.2.9519653", "1_80");

    boost_ndk(env.home())
        .env("ANDROID_NDK_ROOT", env.ndk())
        .env("BOOST_ROOT", env.boost())
        .args(["config", "--print", "--arch", "x86"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i686-linux-android26-clang++"));
}

#[test]
fn test_missing_roots() {
    let tmp = TempDir::new().unwrap();

    boost_ndk(tmp.path())
        .args(["config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no NDK root given"));
}

// ============================================================================
// boost-ndk build
// ============================================================================

#[test]
fn test_build_dry_run() {
    let env = Env::new("25.2.9519653", "1_80");

    env.cmd()
        .args(["build", "--dry-run", "--arch", "x86", "-j", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("using clang : x86"))
        .stdout(predicate::str::contains("-j4 target-os=android toolset=clang-x86 "))
        .stdout(predicate::str::contains("--without-python"))
        .stdout(predicate::str::contains("install -a"))
        .stderr(predicate::str::contains("Configuring clang toolsets for x86"));

    assert!(!env.user_config().exists());
}

#[test]
fn test_build_dry_run_with_libs() {
    let env = Env::new("25.2.9519653", "1_80");

    env.cmd()
        .args([
            "build",
            "--dry-run",
            "--arch",
            "arm64-v8a",
            "--with",
            "system",
            "--link",
            "shared",
            "--log-to-file",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("--with-system"))
        .stdout(predicate::str::contains("link=shared"))
        .stdout(predicate::str::contains("--without-").not())
        .stdout(predicate::str::contains("build_log_arm64-v8a.txt"));
}

#[test]
fn test_log_to_file_can_be_turned_off() {
    let env = Env::new("25.2.9519653", "1_80");
    write(env.home(), "boost-ndk.toml", "[build]\nlog_to_file = true\n");

    env.cmd()
        .args(["build", "--dry-run", "--arch", "x86"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build_log_x86.txt"));

    env.cmd()
        .args(["build", "--dry-run", "--arch", "x86", "--log-to-file=false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build_log_").not());
}

#[test]
fn test_build_rejects_bad_layout() {
    let env = Env::new("25.2.9519653", "1_80");

    env.cmd()
        .args(["build", "--dry-run", "--layout", "flat"])
        .assert()
        .failure();
}

// ============================================================================
// boost-ndk patch / restore
// ============================================================================

#[test]
fn test_patch_and_restore_round_trip() {
    let env = Env::new("25.2.9519653", "1_76");
    let path_cpp = env.boost().join("libs/filesystem/src/path.cpp");
    write(&env.boost(), "libs/filesystem/src/path.cpp", PATH_CPP);

    env.cmd()
        .args(["patch"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Patched"));

    let patched = fs::read_to_string(&path_cpp).unwrap();
    assert!(patched.contains(" || defined(__ANDROID__)\n"));
    assert!(env.boost().join("libs/filesystem/src/path.cpp.src_bakup").exists());

    // A second run starts from the backup, so the edit is not doubled.
    env.cmd().args(["patch"]).assert().success();
    assert_eq!(fs::read_to_string(&path_cpp).unwrap(), patched);

    env.cmd()
        .args(["restore"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Restored"));
    assert_eq!(fs::read_to_string(&path_cpp).unwrap(), PATH_CPP);
}

#[test]
fn test_restore_without_backups() {
    let env = Env::new("25.2.9519653", "1_80");

    env.cmd()
        .args(["restore"])
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to restore"));
}

// ============================================================================
// boost-ndk check
// ============================================================================

#[test]
fn test_check_reports_failures() {
    let env = Env::new("22.1.7171670", "1_80");

    env.cmd()
        .args(["check", "--arch", "x86"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] NDK"))
        .stdout(predicate::str::contains("[OK] Boost"));
}

#[test]
fn test_check_passes_with_driver() {
    let env = Env::new("25.2.9519653", "1_80");
    let driver = if cfg!(windows) { "b2.exe" } else { "b2" };
    write(&env.boost(), driver, "");

    env.cmd()
        .args(["check", "--arch", "x86_64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] NDK"))
        .stdout(predicate::str::contains("[OK] b2"));
}

// ============================================================================
// boost-ndk completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    boost_ndk(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("boost-ndk"));
}
