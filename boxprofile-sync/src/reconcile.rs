//! Tree reconciler: converge one flat directory to a desired file set.
//!
//! Only regular files directly inside `root` whose *file name* matches the
//! glob are managed. Everything else in the directory is left untouched.
//!
//! Ordering: every desired file is written before any stale file is deleted,
//! so an aborted pass can leave extra profiles behind but never removes one
//! that is still wanted. The first I/O error aborts the pass; re-running it is
//! safe.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glob::Pattern;

use boxprofile_core::FileArtifact;

use crate::error::{io_err, SyncError};
use crate::writer::{write_sparingly, WriteResult};

/// What a pass is going to do, computed from one directory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Desired paths, in artifact order. All are (re)written.
    pub to_write: Vec<PathBuf>,
    /// Managed files on disk that are no longer desired, sorted.
    pub to_delete: Vec<PathBuf>,
}

/// What a pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub writes: Vec<WriteResult>,
    /// Stale files removed (or, in dry-run mode, that would be removed).
    pub deleted: Vec<PathBuf>,
    pub dry_run: bool,
}

impl ReconcileReport {
    pub fn written(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Unchanged { .. }))
            .count()
    }
}

fn compile(glob: &str) -> Result<Pattern, SyncError> {
    Pattern::new(glob).map_err(|source| SyncError::Pattern {
        pattern: glob.to_string(),
        source,
    })
}

/// Regular files directly inside `root` whose name matches `pattern`, sorted.
///
/// Symlinks and directories are excluded. A missing `root` has no files.
pub fn managed_files(root: &Path, glob: &str) -> Result<Vec<PathBuf>, SyncError> {
    let pattern = compile(glob)?;
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(io_err(root, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(root, e))?;
        let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name();
        if pattern.matches(&name.to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Compute the write and delete sets for `artifacts` against `root`.
pub fn plan(root: &Path, glob: &str, artifacts: &[FileArtifact]) -> Result<ReconcilePlan, SyncError> {
    let current = managed_files(root, glob)?;
    let desired: HashSet<&Path> = artifacts.iter().map(|a| a.path.as_path()).collect();
    let to_delete = current
        .into_iter()
        .filter(|p| !desired.contains(p.as_path()))
        .collect();
    Ok(ReconcilePlan {
        to_write: artifacts.iter().map(|a| a.path.clone()).collect(),
        to_delete,
    })
}

fn log_plan(plan: &ReconcilePlan) {
    tracing::info!("files to create/update:");
    if plan.to_write.is_empty() {
        tracing::info!("  (none)");
    }
    for path in &plan.to_write {
        tracing::info!("  - {}", path.display());
    }
    tracing::info!("files to delete:");
    if plan.to_delete.is_empty() {
        tracing::info!("  (none)");
    }
    for path in &plan.to_delete {
        tracing::info!("  - {}", path.display());
    }
}

/// Converge `root` so that its files matching `glob` are exactly `artifacts`.
///
/// Every artifact is rewritten unconditionally; stale matching files are then
/// deleted. With `dry_run` nothing on disk changes and the report lists what
/// would have happened.
pub fn reconcile(
    root: &Path,
    glob: &str,
    artifacts: &[FileArtifact],
    dry_run: bool,
) -> Result<ReconcileReport, SyncError> {
    let plan = plan(root, glob, artifacts)?;
    log_plan(&plan);

    if dry_run {
        return Ok(ReconcileReport {
            writes: plan
                .to_write
                .into_iter()
                .map(|path| WriteResult::WouldWrite { path })
                .collect(),
            deleted: plan.to_delete,
            dry_run: true,
        });
    }
    apply(plan, artifacts)
}

/// Carry out `plan`: write every artifact, then delete the stale files.
///
/// A stale file that is already gone counts as deleted.
pub fn apply(plan: ReconcilePlan, artifacts: &[FileArtifact]) -> Result<ReconcileReport, SyncError> {
    let mut writes = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        writes.push(write_sparingly(&artifact.content, &artifact.path, 0, true)?);
    }

    let mut deleted = Vec::with_capacity(plan.to_delete.len());
    for path in plan.to_delete {
        tracing::info!("deleting file: {}", path.display());
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("already gone: {}", path.display());
            }
            Err(e) => return Err(io_err(&path, e)),
        }
        deleted.push(path);
    }

    Ok(ReconcileReport {
        writes,
        deleted,
        dry_run: false,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
