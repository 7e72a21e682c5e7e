//! Error types for boxprofile-sync.

use std::path::PathBuf;

use thiserror::Error;

use boxprofile_core::ManifestError;
use boxprofile_renderer::RenderError;
use boxprofile_source::SourceError;

/// All errors that can arise from a reconciliation pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context. Aborts the pass.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The managed-file glob could not be compiled.
    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error rendering the manifest document.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// The artifact source failed (missing command, listing failure).
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// A target cannot run because something it needs is absent.
    #[error("{target}: missing dependency: {dependency}")]
    MissingDependency { target: String, dependency: String },

    /// A target query named no known target.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
