//! Reversible byte-level patches of upstream source files.
//!
//! Each patched file gets a sibling `<file>.src_bakup` holding its pristine
//! contents. The backup is written once, the first time the file is touched,
//! and is never overwritten afterwards; every later patch run starts by
//! restoring from it. Patching the same file any number of times therefore
//! produces the same result as patching it once.
//!
//! Per file the manager tracks a small state machine:
//!
//! ```text
//!  Pristine ──backup_and_reset──▶ BackedUp ──apply/prepend──▶ Patched
//!                                    ▲                          │
//!                                    └─────backup_and_reset─────┘
//! ```

pub mod catalog;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::errors::{FormatError, Result};
use crate::util::fs;

pub use catalog::{PatchEdit, PatchOutcome, PatchSpec};

/// Suffix appended to a file's path to name its backup.
pub const BACKUP_SUFFIX: &str = ".src_bakup";

/// Anchor used to detect the line ending of C++ and jam sources.
pub const DEFAULT_ANCHOR: &[u8] = b"include";

/// Line terminator convention of a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    CrLf,
    Cr,
    Lf,
}

impl LineEnding {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::CrLf => b"\r\n",
            LineEnding::Cr => b"\r",
            LineEnding::Lf => b"\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::CrLf => write!(f, "CRLF"),
            LineEnding::Cr => write!(f, "CR"),
            LineEnding::Lf => write!(f, "LF"),
        }
    }
}

/// Where a file is in its patch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    /// Not touched by this manager.
    Pristine,
    /// Backup exists and the file matches it.
    BackedUp,
    /// At least one edit has been written since the last reset.
    Patched,
}

/// A file under patch management.
#[derive(Debug, Clone)]
pub struct PatchRecord {
    target: PathBuf,
    backup: PathBuf,
    line_ending: Option<LineEnding>,
    state: PatchState,
}

impl PatchRecord {
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn backup(&self) -> &Path {
        &self.backup
    }

    /// Detected line ending; `None` until the file has been reset.
    pub fn line_ending(&self) -> Option<LineEnding> {
        self.line_ending
    }

    pub fn state(&self) -> PatchState {
        self.state
    }
}

/// Backup path for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Split `content` into lines, each keeping its terminator (`\r\n`, `\n`,
/// or a lone `\r`).
fn lines_with_terminators(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) if rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n') => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

/// Line ending of the first line in `content` containing `anchor`.
fn line_ending_of(path: &Path, content: &[u8], anchor: &[u8]) -> Result<LineEnding> {
    let line = lines_with_terminators(content)
        .find(|line| contains(line, anchor))
        .ok_or_else(|| FormatError::AnchorNotFound {
            path: path.to_path_buf(),
            anchor: String::from_utf8_lossy(anchor).into_owned(),
        })?;

    if line.ends_with(b"\r\n") {
        Ok(LineEnding::CrLf)
    } else if line.ends_with(b"\r") {
        Ok(LineEnding::Cr)
    } else if line.ends_with(b"\n") {
        Ok(LineEnding::Lf)
    } else {
        Err(FormatError::UnterminatedLine {
            path: path.to_path_buf(),
            line: String::from_utf8_lossy(line).into_owned(),
        }
        .into())
    }
}

/// Detect the line ending used by `path`, judged by the first line that
/// contains `anchor`.
pub fn detect_line_ending(path: &Path, anchor: &[u8]) -> Result<LineEnding> {
    let content = fs::read(path)?;
    line_ending_of(path, &content, anchor)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

/// Replace every non-overlapping occurrence of `find` with `replace`.
///
/// Returns the new content and the number of replacements.
pub fn replace_all(content: &[u8], find: &[u8], replace: &[u8]) -> (Vec<u8>, usize) {
    if find.is_empty() {
        return (content.to_vec(), 0);
    }

    let mut out = Vec::with_capacity(content.len());
    let mut count = 0;
    let mut i = 0;
    while i < content.len() {
        if content[i..].starts_with(find) {
            out.extend_from_slice(replace);
            i += find.len();
            count += 1;
        } else {
            out.push(content[i]);
            i += 1;
        }
    }
    (out, count)
}

/// Applies and reverts patches, one record per file.
#[derive(Debug)]
pub struct PatchManager {
    anchor: Vec<u8>,
    records: BTreeMap<PathBuf, PatchRecord>,
}

impl Default for PatchManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchManager {
    /// Create a manager that detects line endings with `include` as anchor.
    pub fn new() -> Self {
        Self::with_anchor(DEFAULT_ANCHOR)
    }

    pub fn with_anchor(anchor: impl Into<Vec<u8>>) -> Self {
        PatchManager {
            anchor: anchor.into(),
            records: BTreeMap::new(),
        }
    }

    /// Current state of `path`.
    pub fn state(&self, path: &Path) -> PatchState {
        self.records
            .get(path)
            .map_or(PatchState::Pristine, |record| record.state)
    }

    pub fn record(&self, path: &Path) -> Option<&PatchRecord> {
        self.records.get(path)
    }

    /// Bring `path` back to its pristine contents, creating the backup the
    /// first time, and return its line ending.
    pub fn backup_and_reset(&mut self, path: &Path) -> Result<LineEnding> {
        let backup = backup_path(path);
        if backup.exists() {
            tracing::debug!("restoring {} from {}", path.display(), backup.display());
            fs::copy(&backup, path)?;
        } else {
            tracing::info!("backing up {} to {}", path.display(), backup.display());
            fs::copy(path, &backup)?;
        }

        let line_ending = detect_line_ending(path, &self.anchor)?;
        self.records.insert(
            path.to_path_buf(),
            PatchRecord {
                target: path.to_path_buf(),
                backup,
                line_ending: Some(line_ending),
                state: PatchState::BackedUp,
            },
        );
        Ok(line_ending)
    }

    /// Make sure `path` has a record and a backup. The file itself is never
    /// rewritten here: an existing backup is kept as is.
    fn ensure_backed_up(&mut self, path: &Path) -> Result<()> {
        if self.records.contains_key(path) {
            return Ok(());
        }
        let backup = backup_path(path);
        if !backup.exists() {
            tracing::info!("backing up {} to {}", path.display(), backup.display());
            fs::copy(path, &backup)?;
        }
        self.records.insert(
            path.to_path_buf(),
            PatchRecord {
                target: path.to_path_buf(),
                backup,
                line_ending: None,
                state: PatchState::BackedUp,
            },
        );
        Ok(())
    }

    fn mark_patched(&mut self, path: &Path) {
        if let Some(record) = self.records.get_mut(path) {
            record.state = PatchState::Patched;
        }
    }

    /// Substitute every occurrence of `find` with `replace` in `path`.
    ///
    /// Returns the number of substitutions. Zero is not an error; the file is
    /// left byte-identical in that case. A file without a backup gets one
    /// first, but the file is never reset from an existing backup.
    pub fn apply(&mut self, path: &Path, find: &[u8], replace: &[u8]) -> Result<usize> {
        self.ensure_backed_up(path)?;

        let content = fs::read(path)?;
        let (patched, count) = replace_all(&content, find, replace);
        if count > 0 {
            fs::write(path, &patched)?;
            self.mark_patched(path);
        }
        Ok(count)
    }

    /// Insert `bytes` at the start of `path`.
    pub fn prepend(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_backed_up(path)?;

        let content = fs::read(path)?;
        let mut patched = Vec::with_capacity(bytes.len() + content.len());
        patched.extend_from_slice(bytes);
        patched.extend_from_slice(&content);
        fs::write(path, &patched)?;
        self.mark_patched(path);
        Ok(())
    }

    /// Restore every path that has a backup. Backups are kept, so this can
    /// be repeated. Returns the paths that were restored.
    pub fn restore_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Vec<PathBuf>> {
        let mut restored = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let backup = backup_path(path);
            if !backup.exists() {
                tracing::debug!("no backup for {}, skipping", path.display());
                continue;
            }
            fs::copy(&backup, path)?;
            if let Some(record) = self.records.get_mut(path) {
                record.state = PatchState::BackedUp;
            }
            tracing::info!("restored {}", path.display());
            restored.push(path.to_path_buf());
        }
        Ok(restored)
    }
}
