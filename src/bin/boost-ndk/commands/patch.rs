//! `boost-ndk patch` command

use anyhow::Result;
use boost_ndk::builder::boost::BoostTree;
use boost_ndk::ops::boost_patch::apply_patches;
use boost_ndk::util::shell::Status;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let tree = BoostTree::validate(&ctx.boost_root()?)?;
    if !tree.version().needs_patches() {
        ctx.shell.warn(format!(
            "Boost {} does not need the Android patches; applying anyway",
            tree.version()
        ));
    }

    let outcomes = apply_patches(&tree)?;
    if outcomes.is_empty() {
        ctx.shell.status(Status::Skipped, "no patchable files found");
    }
    for outcome in &outcomes {
        if outcome.fully_applied() {
            ctx.shell.status(Status::Patched, outcome.path.display());
        } else {
            ctx.shell.status(
                Status::Skipped,
                format!(
                    "{} ({} of {} edit(s) did not match)",
                    outcome.path.display(),
                    outcome.skipped,
                    outcome.applied + outcome.skipped
                ),
            );
        }
    }
    Ok(())
}
