//! CLI definitions using clap.

use std::path::PathBuf;

use boost_ndk::core::settings::{Layout, LinkMode, PatchMode, Threading};
use boost_ndk::util::config::BuildConfig;
use boost_ndk::util::shell::ColorChoice;
use clap::{Args, Parser, Subcommand};

/// boost-ndk - Cross-compile Boost for Android with the NDK and b2
#[derive(Parser)]
#[command(name = "boost-ndk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Project config file (defaults to ./boost-ndk.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Android NDK root
    #[arg(long, global = true, env = "ANDROID_NDK_ROOT", value_name = "DIR")]
    pub ndk_root: Option<PathBuf>,

    /// Boost source root
    #[arg(long, global = true, env = "BOOST_ROOT", value_name = "DIR")]
    pub boost_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build Boost for each requested Android ABI
    Build(BuildArgs),

    /// Generate tools/build/src/user-config.jam
    Config(ConfigArgs),

    /// Apply the Android source patches
    Patch,

    /// Restore patched sources from their backups
    Restore,

    /// Check the NDK, Boost tree and host tools
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that targets ABIs.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Android ABI to build (repeatable; defaults to all four)
    #[arg(long = "arch", value_name = "ABI")]
    pub archs: Vec<String>,

    /// Minimum Android API level
    #[arg(long, value_name = "N")]
    pub api_level: Option<u32>,
}

impl TargetArgs {
    /// The flags as a config layer.
    pub fn to_build_config(&self) -> BuildConfig {
        BuildConfig {
            archs: (!self.archs.is_empty()).then(|| self.archs.clone()),
            api_level: self.api_level,
            ..Default::default()
        }
    }
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Build only this library (repeatable)
    #[arg(long, value_name = "LIB")]
    pub with: Vec<String>,

    /// Skip this library (repeatable; replaces the default exclusions)
    #[arg(long, value_name = "LIB")]
    pub without: Vec<String>,

    /// Write each ABI's b2 output to build_log_<abi>.txt (`=false` overrides the config)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub log_to_file: Option<bool>,

    /// Library naming layout: system, tagged, versioned
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<Layout>,

    /// Link mode: static, shared
    #[arg(long, value_name = "MODE")]
    pub link: Option<LinkMode>,

    /// Threading model: multi, single
    #[arg(long, value_name = "MODEL")]
    pub threading: Option<Threading>,

    /// When to patch sources: auto, always, never
    #[arg(long, value_name = "WHEN")]
    pub patch: Option<PatchMode>,

    /// Number of parallel b2 jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Print the configuration and commands without running anything
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildArgs {
    pub fn to_build_config(&self) -> BuildConfig {
        BuildConfig {
            with: self.with.clone(),
            without: (!self.without.is_empty()).then(|| self.without.clone()),
            log_to_file: self.log_to_file,
            layout: self.layout,
            link: self.link,
            threading: self.threading,
            patch: self.patch,
            jobs: self.jobs,
            ..self.target.to_build_config()
        }
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print user-config.jam to stdout instead of writing it
    #[arg(long)]
    pub print: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
