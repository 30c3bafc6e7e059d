//! `boost-ndk build` command

use anyhow::Result;
use boost_ndk::ops::boost_build::{build, BuildOptions};
use boost_ndk::util::diagnostic::{emit, suggestions, Diagnostic};
use boost_ndk::util::shell::Status;

use super::Context;
use crate::cli::BuildArgs;

pub fn execute(args: BuildArgs, ctx: &Context) -> Result<()> {
    let settings = ctx.settings(args.to_build_config())?;
    let opts = BuildOptions {
        ndk_root: ctx.ndk_root()?,
        boost_root: ctx.boost_root()?,
        settings,
        host: ctx.host,
        dry_run: args.dry_run,
    };

    let report = build(&opts, &ctx.shell)?;

    if report.dry_run {
        println!("# {}", report.user_config.display());
        print!("{}", report.user_config_text);
        for arch in &report.archs {
            println!("{}", arch.command);
        }
        return Ok(());
    }

    let failed: Vec<String> = report.failures().map(|a| a.arch.to_string()).collect();
    if failed.is_empty() {
        ctx.shell.status(
            Status::Finished,
            format!("{} ABI(s) installed under android/", report.archs.len()),
        );
        return Ok(());
    }

    // Failed ABIs are reported, not turned into an exit code.
    let mut diagnostic = Diagnostic::warning(format!(
        "b2 failed for {} of {} ABI(s): {}",
        failed.len(),
        report.archs.len(),
        failed.join(", ")
    ));
    for arch in report.failures() {
        if let Some(ref log) = arch.log {
            diagnostic = diagnostic.with_context(format!("{}: {}", arch.arch, log.display()));
        }
    }
    if report.failures().all(|a| a.log.is_none()) {
        diagnostic = diagnostic.with_suggestion(suggestions::BUILD_FAILED);
    }
    emit(&diagnostic, ctx.shell.use_color());
    Ok(())
}
