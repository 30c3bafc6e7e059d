//! `boost-ndk config` command

use anyhow::Result;
use boost_ndk::ops::boost_config::{configure, ConfigureOptions};
use boost_ndk::util::shell::Status;

use super::Context;
use crate::cli::ConfigArgs;

pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    let opts = ConfigureOptions {
        ndk_root: ctx.ndk_root()?,
        boost_root: ctx.boost_root()?,
        settings: ctx.settings(args.target.to_build_config())?,
        host: ctx.host,
        dry_run: args.print,
    };

    let result = configure(&opts)?;

    if args.print {
        print!("{}", result.user_config);
    } else {
        ctx.shell.status(
            Status::Wrote,
            format!(
                "{} ({} toolset(s), NDK {}, Boost {})",
                result.path.display(),
                result.user_config.stanzas().len(),
                result.environment.ndk.revision(),
                result.environment.boost.version()
            ),
        );
    }
    Ok(())
}
