//! Android compatibility patches for Boost releases before 1.77.
//!
//! Each edit is stored as lines without terminators and rendered with the
//! target file's own line ending, so the same patch applies to LF and CRLF
//! checkouts. Edits are tied to specific upstream text; against newer
//! sources they match nothing and are reported as skipped.

use std::path::{Path, PathBuf};

use crate::builder::boost::join_all;
use crate::patch::{LineEnding, PatchManager};
use crate::util::errors::Result;

/// One edit within a file.
#[derive(Debug, Clone, Copy)]
pub enum PatchEdit {
    /// Insert lines at the top of the file.
    Prepend(&'static [&'static str]),
    /// Replace an exact run of lines.
    Replace {
        find: &'static [&'static str],
        replace: &'static [&'static str],
    },
}

/// The edits for one file, relative to the Boost root.
#[derive(Debug, Clone, Copy)]
pub struct PatchSpec {
    pub name: &'static str,
    pub path: &'static [&'static str],
    pub edits: &'static [PatchEdit],
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub name: &'static str,
    pub path: PathBuf,
    pub line_ending: LineEnding,
    /// Edits that changed the file.
    pub applied: usize,
    /// Replacements whose text was not found.
    pub skipped: usize,
}

impl PatchOutcome {
    pub fn fully_applied(&self) -> bool {
        self.skipped == 0
    }
}

/// Join `lines`, terminating each with `ending`.
pub fn render(lines: &[&str], ending: LineEnding) -> Vec<u8> {
    let mut out = Vec::new();
    for line in lines {
        out.extend_from_slice(line.as_bytes());
        out.extend_from_slice(ending.as_bytes());
    }
    out
}

impl PatchSpec {
    /// Absolute path of the patched file.
    pub fn target(&self, boost_root: &Path) -> PathBuf {
        join_all(boost_root, self.path)
    }

    /// Reset the file from its backup and apply every edit.
    pub fn apply(&self, manager: &mut PatchManager, boost_root: &Path) -> Result<PatchOutcome> {
        let target = self.target(boost_root);
        let ending = manager.backup_and_reset(&target)?;

        let mut applied = 0;
        let mut skipped = 0;
        for edit in self.edits {
            match *edit {
                PatchEdit::Prepend(lines) => {
                    manager.prepend(&target, &render(lines, ending))?;
                    applied += 1;
                }
                PatchEdit::Replace { find, replace } => {
                    let count =
                        manager.apply(&target, &render(find, ending), &render(replace, ending))?;
                    if count == 0 {
                        tracing::warn!(
                            "patch `{}` does not match {}; leaving that section unchanged",
                            self.name,
                            target.display()
                        );
                        skipped += 1;
                    } else {
                        applied += 1;
                    }
                }
            }
        }

        Ok(PatchOutcome {
            name: self.name,
            path: target,
            line_ending: ending,
            applied,
            skipped,
        })
    }
}

/// `boost/system/error_code.hpp` uses `snprintf` without including it.
pub const ERROR_CODE_HPP: PatchSpec = PatchSpec {
    name: "error_code.hpp stdio",
    path: &["boost", "system", "error_code.hpp"],
    edits: &[PatchEdit::Prepend(&["#include <stdio.h>"])],
};

/// `libs/filesystem/src/path.cpp`: Android paths are UTF-8, like the BSDs.
pub const FILESYSTEM_PATH_CPP: PatchSpec = PatchSpec {
    name: "filesystem path.cpp utf-8",
    path: &["libs", "filesystem", "src", "path.cpp"],
    edits: &[
        PatchEdit::Replace {
            find: &[
                "# include <windows.h>",
                "#elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\",
                " || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__)",
                "# include <boost/filesystem/detail/utf8_codecvt_facet.hpp>",
                "#endif",
            ],
            replace: &[
                "# include <windows.h>",
                "#elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\",
                " || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__) \\",
                " || defined(__ANDROID__)",
                "# include <boost/filesystem/detail/utf8_codecvt_facet.hpp>",
                "#endif",
            ],
        },
        PatchEdit::Replace {
            find: &[
                "# elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\",
                "  || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__)",
                "    // \"All BSD system functions expect their string parameters to be in UTF-8 encoding",
            ],
            replace: &[
                "# elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\",
                "  || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__) \\",
                "  || defined(__ANDROID__)",
                "    // \"All BSD system functions expect their string parameters to be in UTF-8 encoding",
            ],
        },
    ],
};

/// `tools/build/src/tools/common.jam`: the NDK clang reports a version the
/// toolset tag logic mangles; always use the first version component.
pub const COMMON_JAM: PatchSpec = PatchSpec {
    name: "common.jam clang version tag",
    path: &["tools", "build", "src", "tools", "common.jam"],
    edits: &[PatchEdit::Replace {
        find: &[
            "    # Ditto, from Clang 4",
            "    if ( $(tag) = clang || $(tag) = clangw ) && $(version[1]) && [ numbers.less 3 $(version[1]) ]",
            "    {",
            "        version = $(version[1]) ;",
        ],
        replace: &[
            "    # Ditto, from Clang 4",
            "    #if ( $(tag) = clang || $(tag) = clangw ) && [ numbers.less 3 $(version[1]) ]",
            "    {",
            "        version = $(version[1]) ;",
        ],
    }],
};

/// Every built-in patch, in application order.
pub const CATALOG: &[PatchSpec] = &[ERROR_CODE_HPP, FILESYSTEM_PATH_CPP, COMMON_JAM];

/// Absolute paths of every file the catalog touches.
pub fn catalog_targets(boost_root: &Path) -> Vec<PathBuf> {
    CATALOG.iter().map(|spec| spec.target(boost_root)).collect()
}

/// Apply the whole catalog. Files that are missing from the tree are
/// skipped with a warning; any other failure aborts.
pub fn apply_catalog(manager: &mut PatchManager, boost_root: &Path) -> Result<Vec<PatchOutcome>> {
    let mut outcomes = Vec::with_capacity(CATALOG.len());
    for spec in CATALOG {
        let target = spec.target(boost_root);
        if !target.exists() {
            tracing::warn!("{} not found; skipping patch `{}`", target.display(), spec.name);
            continue;
        }
        outcomes.push(spec.apply(manager, boost_root)?);
    }
    Ok(outcomes)
}

/// Restore every catalog file that has a backup.
pub fn restore_catalog(manager: &mut PatchManager, boost_root: &Path) -> Result<Vec<PathBuf>> {
    manager.restore_all(&catalog_targets(boost_root))
}
