//! # boxprofile-sync
//!
//! Sparing writer, tree reconciler, manifest writer, and targets.
//!
//! Call [`pipeline::run_at`] to enumerate containers and converge every
//! selected target directory, or use [`reconcile::reconcile`] directly to
//! converge any flat directory to a set of [`FileArtifact`]s.
//!
//! [`FileArtifact`]: boxprofile_core::FileArtifact

pub mod diff;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod reconcile;
pub mod target;
pub mod writer;

pub use diff::{diff_target, FileDiff};
pub use error::SyncError;
pub use reconcile::{apply, reconcile, ReconcilePlan, ReconcileReport};
pub use target::{targets_for_query, KonsoleTarget, Target, TargetReport, TARGET_NAMES};
pub use writer::{write_sparingly, WriteResult};
pub use pipeline::{run, run_at, TargetOutcome};
