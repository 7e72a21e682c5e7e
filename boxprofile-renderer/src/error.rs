//! Error types for boxprofile-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from profile rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (parse, context, or render).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
