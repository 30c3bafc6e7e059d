//! `boost-ndk check` command

use anyhow::Result;
use boost_ndk::core::abi::Arch;
use boost_ndk::core::version::MIN_API_LEVEL;
use boost_ndk::ops::check::{check, format_report, CheckOptions};

use super::Context;
use crate::cli::CheckArgs;

pub fn execute(args: CheckArgs, ctx: &Context) -> Result<()> {
    let mut build = ctx.config.build.clone();
    if !args.target.archs.is_empty() {
        build.archs = Some(args.target.archs.clone());
    }
    if args.target.api_level.is_some() {
        build.api_level = args.target.api_level;
    }

    let archs = match build.archs {
        Some(ref tags) => tags
            .iter()
            .map(|tag| tag.parse::<Arch>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(boost_ndk::util::errors::Error::from)?,
        None => Arch::ALL.to_vec(),
    };

    let options = CheckOptions {
        ndk_root: ctx.config.paths.ndk_root.clone(),
        boost_root: ctx.config.paths.boost_root.clone(),
        api_level: build.api_level.unwrap_or(MIN_API_LEVEL),
        archs,
        host: ctx.host,
    };

    let report = check(&options);
    print!("{}", format_report(&report, ctx.verbose));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
