//! Manifest writer: record the whole desired set next to the profiles.

use std::path::Path;

use chrono::Utc;

use boxprofile_core::{
    manifest::{self, Manifest, BANNER_LINES},
    paths, Artifact,
};

use crate::error::SyncError;
use crate::writer::{write_sparingly, WriteResult};

/// (Re)write `<dir>/boxprofile-manifest.yaml` for `target`.
///
/// The banner line carries a timestamp and is ignored when comparing, so the
/// file is only rewritten when the set of profiles changes.
pub fn write_manifest(
    dir: &Path,
    target: &str,
    artifacts: &[Artifact],
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let path = paths::manifest_path(dir);
    let doc = Manifest::new(
        target,
        artifacts.iter().map(Artifact::to_manifest_entry).collect(),
    );
    let content = manifest::render(&doc, Utc::now())?;

    tracing::info!("{target}: manifest lists {} profile(s)", doc.profiles.len());
    if dry_run {
        return Ok(WriteResult::WouldWrite { path });
    }
    write_sparingly(&content, &path, BANNER_LINES, false)
}
