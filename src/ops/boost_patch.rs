//! Implementation of `boost-ndk patch` and `boost-ndk restore`.

use std::path::{Path, PathBuf};

use crate::builder::boost::BoostTree;
use crate::core::settings::PatchMode;
use crate::core::version::LibraryVersion;
use crate::patch::catalog::{apply_catalog, restore_catalog};
use crate::patch::{PatchManager, PatchOutcome};
use crate::util::errors::Result;

/// Whether `mode` calls for patching a tree at `version`.
pub fn should_patch(mode: PatchMode, version: &LibraryVersion) -> bool {
    match mode {
        PatchMode::Always => true,
        PatchMode::Never => false,
        PatchMode::Auto => version.needs_patches(),
    }
}

/// Apply the patch catalog to a validated tree.
pub fn apply_patches(tree: &BoostTree) -> Result<Vec<PatchOutcome>> {
    let mut manager = PatchManager::new();
    let outcomes = apply_catalog(&mut manager, tree.root())?;
    for outcome in &outcomes {
        tracing::debug!(
            "{}: {} edit(s) applied, {} skipped ({})",
            outcome.path.display(),
            outcome.applied,
            outcome.skipped,
            outcome.line_ending
        );
    }
    Ok(outcomes)
}

/// Apply the catalog when `mode` calls for it. Returns `None` when skipped.
pub fn patch_for_mode(tree: &BoostTree, mode: PatchMode) -> Result<Option<Vec<PatchOutcome>>> {
    if !should_patch(mode, tree.version()) {
        tracing::debug!("patching skipped for Boost {} ({} mode)", tree.version(), mode);
        return Ok(None);
    }
    apply_patches(tree).map(Some)
}

/// Restore every catalog file from its backup. Works on any directory, so a
/// tree whose version header was damaged can still be recovered.
pub fn restore_sources(boost_root: &Path) -> Result<Vec<PathBuf>> {
    let mut manager = PatchManager::new();
    restore_catalog(&mut manager, boost_root)
}
