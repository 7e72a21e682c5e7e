//! Dry-run unified diff support for `boxprofile diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use boxprofile_core::Artifact;

use crate::{error::io_err, reconcile, target::Target, SyncError};

/// A single file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render what a pass would write for `target` and compare it with disk.
///
/// Profiles whose content is identical are omitted; stale profiles show up
/// as full deletions. No files are written.
pub fn diff_target(target: &dyn Target, artifacts: &[Artifact]) -> Result<Vec<FileDiff>, SyncError> {
    let files = target.render(artifacts)?;
    let plan = reconcile::plan(target.directory(), &target.glob(), &files)?;
    let root = target.directory();

    let mut diffs = Vec::new();
    for file in &files {
        let existing = read_existing_or_empty(&file.path)?;
        let rendered = normalize_line_endings(&file.content);
        if existing == rendered {
            continue;
        }
        diffs.push(unified(root, &file.path, &existing, &rendered));
    }
    for path in &plan.to_delete {
        let existing = read_existing_or_empty(path)?;
        diffs.push(unified(root, path, &existing, ""));
    }
    Ok(diffs)
}

fn unified(root: &Path, path: &Path, old: &str, new: &str) -> FileDiff {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified_diff = TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string();
    FileDiff {
        path: path.to_path_buf(),
        unified_diff,
    }
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
