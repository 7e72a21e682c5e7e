//! boxprofile core library: artifact model, manifest document, paths, errors.
//!
//! - [`types`]: newtypes, [`Artifact`], [`FileArtifact`], [`ManifestEntry`]
//! - [`manifest`]: render / parse / load the per-directory manifest
//! - [`paths`]: well-known locations rooted at an explicit home
//! - [`error`]: [`ManifestError`]

pub mod error;
pub mod manifest;
pub mod paths;
pub mod types;

pub use error::ManifestError;
pub use manifest::Manifest;
pub use types::{Artifact, ArtifactName, FileArtifact, ManifestEntry, SourceKind, FILE_PREFIX};
