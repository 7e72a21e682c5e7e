//! Sparing writer: only touch files whose content actually changed.
//!
//! ## `write_sparingly`
//!
//! 1. Normalise line endings to LF.
//! 2. Unless `no_compare` is set, read the existing file (if any) and compare
//!    it with the new content, skipping `ignore_leading_lines` lines on both
//!    sides. Equal → [`WriteResult::Unchanged`], nothing is written.
//! 3. Write to `<path>.boxprofile.tmp`.
//! 4. Rename to the final path (atomic on POSIX). On failure the tmp file is
//!    removed and the original is left intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed, file was absent, or comparison was skipped).
    Written { path: PathBuf },
    /// File was skipped: on-disk content already matches.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// write_sparingly
// ---------------------------------------------------------------------------

/// Write `content` to `path` unless the file already holds the same content.
///
/// With `no_compare` the file is always rewritten. Otherwise the first
/// `ignore_leading_lines` lines of both the existing and the new content are
/// ignored when comparing, so a volatile banner line does not force a write.
pub fn write_sparingly(
    content: &str,
    path: &Path,
    ignore_leading_lines: usize,
    no_compare: bool,
) -> Result<WriteResult, SyncError> {
    let normalized = content.replace("\r\n", "\n");

    if !no_compare {
        if let Some(existing) = read_existing(path)? {
            if same_after_skip(&existing, &normalized, ignore_leading_lines) {
                tracing::info!("unchanged, skipping write: {}", path.display());
                return Ok(WriteResult::Unchanged {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    let tmp = tmp_path_for(path);
    atomic_write_with_tmp(path, &normalized, &tmp)?;
    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// `<path>.boxprofile.tmp`: never matches a managed glob.
pub(crate) fn tmp_path_for(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.boxprofile.tmp", path.display()))
}

fn read_existing(path: &Path) -> Result<Option<String>, SyncError> {
    if !path.is_file() {
        return Ok(None);
    }
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text.replace("\r\n", "\n"))),
        // Removed between the existence check and the read.
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        // Not text we could have written; treat as different and replace it.
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            tracing::warn!("existing file is not valid UTF-8, rewriting: {}", path.display());
            Ok(None)
        }
        Err(e) => Err(io_err(path, e)),
    }
}

fn same_after_skip(existing: &str, new: &str, skip: usize) -> bool {
    existing.split('\n').skip(skip).eq(new.split('\n').skip(skip))
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
