//! Per-directory manifest document.
//!
//! # Layout
//!
//! ```text
//! # generated by boxprofile at 2026-01-01T00:00:00+00:00
//! target: konsole
//! profiles:
//! - name: ubuntu-box
//!   source: distrobox
//!   exec: distrobox enter ubuntu-box
//! ```
//!
//! The first line is a volatile banner. Writers compare content with that
//! line skipped, so a pass with an unchanged profile set leaves the file alone.
//! The manifest is for inspection only; reconciliation never reads it back.

use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::paths::manifest_path;
use crate::types::ManifestEntry;

/// Number of leading banner lines in a rendered manifest.
pub const BANNER_LINES: usize = 1;

/// The whole materialized set for one target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub target: String,
    #[serde(default)]
    pub profiles: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(target: impl Into<String>, profiles: Vec<ManifestEntry>) -> Self {
        Self {
            target: target.into(),
            profiles,
        }
    }
}

/// Render a manifest document, banner line first.
pub fn render(manifest: &Manifest, generated_at: DateTime<Utc>) -> Result<String, ManifestError> {
    let body = serde_yaml::to_string(manifest)?;
    Ok(format!(
        "# generated by boxprofile at {}\n{body}",
        generated_at.to_rfc3339()
    ))
}

/// Parse manifest text previously produced by [`render`].
///
/// `path` is only used for error context.
pub fn parse(path: &Path, text: &str) -> Result<Manifest, ManifestError> {
    serde_yaml::from_str(text).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the manifest stored in `dir`, or `None` if there is none yet.
pub fn load_at(dir: &Path) -> Result<Option<Manifest>, ManifestError> {
    let path = manifest_path(dir);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ManifestError::Io { path, source: e }),
    };
    parse(&path, &text).map(Some)
}
