//! `user-config.jam` generation.
//!
//! The generated file declares one `using clang : <tag>` toolset per Android
//! ABI, each pointing at the NDK's triple-prefixed clang driver:
//!
//! ```text
//! import os ;
//! local arm64v8a_cxx_path = "/ndk/toolchains/llvm/prebuilt/linux-x86_64/bin/aarch64-linux-android26-clang++" ;
//!
//! local arm64v8a_prefix = "/ndk/toolchains/llvm/prebuilt/linux-x86_64/bin/aarch64-linux-android" ;
//! local ndk_bin = "/ndk/toolchains/llvm/prebuilt/linux-x86_64/bin" ;
//!
//!
//! # -----------------------------------
//! using clang : arm64v8a
//! :
//! $(arm64v8a_cxx_path)
//! :
//! <archiver>$(ndk_bin)/llvm-ar
//! <ranlib>$(ndk_bin)/llvm-ranlib
//! <compileflags>-fPIC
//! ...
//! ;
//! ```
//!
//! Jam treats `\` as an escape character, so every path is written with
//! forward slashes whatever the host convention.

use std::fmt::{self, Write as _};
use std::path::Path;

use crate::builder::boost::BoostTree;
use crate::builder::ndk::{self, NdkToolchain};
use crate::core::abi::{Arch, HostPlatform};
use crate::util::errors::{ConfigError, Result};
use crate::util::fs::{to_forward_slashes, write_atomic};

/// Flags applied to every architecture.
pub const COMPILE_FLAGS: &[&str] = &[
    "-fPIC",
    "-ffunction-sections",
    "-fdata-sections",
    "-funwind-tables",
    "-fstack-protector-strong",
    "-no-canonical-prefixes",
    "-Wformat",
    "-Werror=format-security",
    "-frtti",
    "-fexceptions",
    "-DNDEBUG",
    "-g",
    "-Oz",
];

const STANZA_SEPARATOR: &str = "# -----------------------------------";

/// One architecture's toolset declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    pub arch: Arch,
    /// Absolute compiler driver path, forward slashes.
    pub cxx_path: String,
    /// Absolute binutils prefix directory, forward slashes.
    pub prefix: String,
}

impl Stanza {
    fn cxx_var(&self) -> String {
        format!("{}_cxx_path", self.arch.jam_tag())
    }

    fn prefix_var(&self) -> String {
        format!("{}_prefix", self.arch.jam_tag())
    }
}

/// The full contents of `user-config.jam`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    host: HostPlatform,
    bin_dir: String,
    stanzas: Vec<Stanza>,
}

impl UserConfig {
    /// Derive the toolsets for `archs` from a validated NDK.
    pub fn new(ndk: &NdkToolchain, api_level: u32, archs: &[Arch]) -> Result<Self> {
        Self::from_root(ndk.root(), ndk.host(), api_level, archs)
    }

    /// Derive the toolsets from an NDK root without validating it.
    pub fn from_root(
        ndk_root: &Path,
        host: HostPlatform,
        api_level: u32,
        archs: &[Arch],
    ) -> Result<Self> {
        if archs.is_empty() {
            return Err(ConfigError::NoArchitectures.into());
        }

        let bin_dir = ndk::bin_dir(ndk_root, host);
        let mut stanzas: Vec<Stanza> = Vec::with_capacity(archs.len());
        for &arch in archs {
            if stanzas.iter().any(|s| s.arch == arch) {
                continue;
            }
            let compiler = ndk::compiler_path(ndk_root, host, arch, api_level);
            let prefix = ndk::binutils_prefix_path(ndk_root, host, arch);
            stanzas.push(Stanza {
                arch,
                cxx_path: to_forward_slashes(&compiler),
                prefix: to_forward_slashes(&prefix),
            });
        }

        Ok(UserConfig {
            host,
            bin_dir: to_forward_slashes(&bin_dir),
            stanzas,
        })
    }

    pub fn stanzas(&self) -> &[Stanza] {
        &self.stanzas
    }

    /// Render the jam text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "import os ;")?;
        for stanza in &self.stanzas {
            writeln!(out, "local {} = \"{}\" ;", stanza.cxx_var(), stanza.cxx_path)?;
        }
        writeln!(out)?;
        for stanza in &self.stanzas {
            writeln!(out, "local {} = \"{}\" ;", stanza.prefix_var(), stanza.prefix)?;
        }
        writeln!(out, "local ndk_bin = \"{}\" ;", self.bin_dir)?;
        writeln!(out)?;
        writeln!(out)?;

        for stanza in &self.stanzas {
            writeln!(out, "{}", STANZA_SEPARATOR)?;
            writeln!(out, "using clang : {}", stanza.arch.jam_tag())?;
            writeln!(out, ":")?;
            writeln!(out, "$({})", stanza.cxx_var())?;
            writeln!(out, ":")?;
            writeln!(out, "<archiver>$(ndk_bin)/llvm-{}", self.host.ar())?;
            writeln!(out, "<ranlib>$(ndk_bin)/llvm-{}", self.host.ranlib())?;
            for flag in COMPILE_FLAGS
                .iter()
                .chain(stanza.arch.extra_compile_flags())
            {
                writeln!(out, "<compileflags>{}", flag)?;
            }
            writeln!(out, ";")?;
            writeln!(out)?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Atomically overwrite the tree's `user-config.jam`.
    pub fn write(&self, tree: &BoostTree) -> Result<()> {
        let path = tree.user_config_path();
        write_atomic(&path, self.render().as_bytes())?;
        tracing::info!("wrote {}", path.display());
        Ok(())
    }
}

impl fmt::Display for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render `user-config.jam` for `archs` with the NDK at `ndk_root`.
pub fn generate(
    ndk_root: &Path,
    host: HostPlatform,
    api_level: u32,
    archs: &[Arch],
) -> Result<String> {
    Ok(UserConfig::from_root(ndk_root, host, api_level, archs)?.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::errors::Error;
    use std::path::PathBuf;

    /// Split rendered text into per-arch stanzas.
    fn stanzas(text: &str) -> Vec<&str> {
        text.split(STANZA_SEPARATOR).skip(1).collect()
    }

    #[test]
    fn test_every_arch_has_one_compiler_and_full_flags() {
        let text = generate(Path::new("/opt/ndk"), HostPlatform::Linux, 26, &Arch::ALL).unwrap();
        let blocks = stanzas(&text);
        assert_eq!(blocks.len(), 4);

        for (block, arch) in blocks.iter().zip(Arch::ALL) {
            assert!(block.contains(&format!("using clang : {}", arch.jam_tag())));
            assert_eq!(block.matches("_cxx_path)").count(), 1);
            assert!(block.contains(&format!("$({}_cxx_path)", arch.jam_tag())));
            for flag in COMPILE_FLAGS {
                assert!(block.contains(&format!("<compileflags>{}\n", flag)), "{}", flag);
            }
            assert_eq!(
                block.contains("<compileflags>-mthumb"),
                arch == Arch::ArmeabiV7a
            );
            assert!(block.trim_end().ends_with(';'));
        }
    }

    #[test]
    fn test_preamble_declares_paths() {
        let text = generate(
            Path::new("/opt/ndk"),
            HostPlatform::Linux,
            26,
            &[Arch::ArmeabiV7a],
        )
        .unwrap();
        assert!(text.starts_with("import os ;\n"));
        assert!(text.contains(
            "local armeabiv7a_cxx_path = \"/opt/ndk/toolchains/llvm/prebuilt/linux-x86_64/bin/armv7a-linux-androideabi26-clang++\" ;"
        ));
        assert!(text.contains(
            "local armeabiv7a_prefix = \"/opt/ndk/toolchains/llvm/prebuilt/linux-x86_64/bin/arm-linux-androideabi\" ;"
        ));
        assert!(text.contains("<archiver>$(ndk_bin)/llvm-ar\n"));
        assert!(text.contains("<ranlib>$(ndk_bin)/llvm-ranlib\n"));
    }

    #[test]
    fn test_windows_root_uses_forward_slashes() {
        let root = PathBuf::from(r"C:\Users\dev\AppData\Local\Android\Sdk\ndk\25.2.9519653");
        let text = generate(&root, HostPlatform::Windows, 26, &Arch::ALL).unwrap();
        assert!(!text.contains('\\'));
        assert!(text.contains("windows-x86_64/bin/aarch64-linux-android26-clang++.cmd"));
        assert!(text.contains("<archiver>$(ndk_bin)/llvm-ar.exe"));
    }

    #[test]
    fn test_two_arch_scenario() {
        let text = generate(
            Path::new("/ndk"),
            HostPlatform::Linux,
            26,
            &[Arch::Arm64V8a, Arch::X86_64],
        )
        .unwrap();
        let config =
            UserConfig::from_root(Path::new("/ndk"), HostPlatform::Linux, 26, &[Arch::Arm64V8a, Arch::X86_64])
                .unwrap();

        assert_eq!(stanzas(&text).len(), 2);
        let paths: Vec<&str> = config.stanzas().iter().map(|s| s.cxx_path.as_str()).collect();
        assert_ne!(paths[0], paths[1]);
        assert!(paths[0].ends_with("aarch64-linux-android26-clang++"));
        assert!(paths[1].ends_with("x86_64-linux-android26-clang++"));
    }

    #[test]
    fn test_duplicate_archs_collapse() {
        let config = UserConfig::from_root(
            Path::new("/ndk"),
            HostPlatform::Linux,
            26,
            &[Arch::X86, Arch::X86],
        )
        .unwrap();
        assert_eq!(config.stanzas().len(), 1);
    }

    #[test]
    fn test_no_archs_is_error() {
        let err = generate(Path::new("/ndk"), HostPlatform::Linux, 26, &[]).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NoArchitectures)));
    }

    #[test]
    fn test_output_is_deterministic() {
        let a = generate(Path::new("/ndk"), HostPlatform::Darwin, 30, &Arch::ALL).unwrap();
        let b = generate(Path::new("/ndk"), HostPlatform::Darwin, 30, &Arch::ALL).unwrap();
        assert_eq!(a, b);
    }
}
