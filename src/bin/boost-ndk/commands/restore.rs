//! `boost-ndk restore` command

use anyhow::Result;
use boost_ndk::ops::boost_patch::restore_sources;
use boost_ndk::util::shell::Status;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let restored = restore_sources(&ctx.boost_root()?)?;
    if restored.is_empty() {
        ctx.shell.note("nothing to restore");
    }
    for path in &restored {
        ctx.shell.status(Status::Restored, path.display());
    }
    Ok(())
}
