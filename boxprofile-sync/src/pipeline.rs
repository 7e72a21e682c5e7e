//! One synchronization pass: enumerate the source, materialize each target.

use std::path::Path;

use boxprofile_source::{DistroboxSource, Source};

use crate::error::SyncError;
use crate::target::{targets_for_query, Target, TargetReport};

/// What happened to one target during a pass.
#[derive(Debug)]
pub enum TargetOutcome {
    Synced(TargetReport),
    /// Dependencies missing; the target was not touched.
    Skipped { target: String, reason: String },
}

impl TargetOutcome {
    pub fn target(&self) -> &str {
        match self {
            TargetOutcome::Synced(report) => &report.target,
            TargetOutcome::Skipped { target, .. } => target,
        }
    }
}

/// Enumerate `source` once and converge every target in `targets`.
///
/// A source whose dependencies are missing fails the pass. A target whose
/// dependencies are missing is skipped with a warning. The first write or
/// delete error aborts the pass.
pub fn run(
    source: &dyn Source,
    targets: &[Box<dyn Target>],
    dry_run: bool,
) -> Result<Vec<TargetOutcome>, SyncError> {
    source.check_dependencies()?;

    let mut usable = Vec::with_capacity(targets.len());
    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        match target.check_dependencies() {
            Ok(()) => usable.push(target),
            Err(e) => {
                tracing::warn!("skipping target {}: {e}", target.name());
                outcomes.push(TargetOutcome::Skipped {
                    target: target.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
    if usable.is_empty() {
        tracing::warn!("no usable targets, nothing to do");
        return Ok(outcomes);
    }

    let artifacts = source.enumerate()?;
    for target in usable {
        tracing::info!("updating target {}", target.name());
        let report = target.materialize(&artifacts, dry_run)?;
        outcomes.push(TargetOutcome::Synced(report));
    }
    Ok(outcomes)
}

/// [`run`] with the Distrobox source and the targets selected by `query`.
pub fn run_at(home: &Path, query: &[String], dry_run: bool) -> Result<Vec<TargetOutcome>, SyncError> {
    let source = DistroboxSource::at(home);
    let targets = targets_for_query(home, query)?;
    run(&source, &targets, dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxprofile_core::{Artifact, FileArtifact};
    use boxprofile_source::SourceError;
    use std::cell::Cell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FakeSource {
        artifacts: Vec<Artifact>,
        available: bool,
        enumerated: Cell<usize>,
    }

    impl FakeSource {
        fn with(names: &[&str]) -> Self {
            Self {
                artifacts: names
                    .iter()
                    .map(|n| Artifact::new(*n, "distrobox", None, format!("distrobox enter {n}")))
                    .collect(),
                available: true,
                enumerated: Cell::new(0),
            }
        }
    }

    impl Source for FakeSource {
        fn name(&self) -> &'static str {
            "distrobox"
        }

        fn check_dependencies(&self) -> Result<(), SourceError> {
            if self.available {
                Ok(())
            } else {
                Err(SourceError::MissingDependency {
                    command: "distrobox".into(),
                })
            }
        }

        fn enumerate(&self) -> Result<Vec<Artifact>, SourceError> {
            self.enumerated.set(self.enumerated.get() + 1);
            Ok(self.artifacts.clone())
        }
    }

    struct PlainTarget {
        dir: PathBuf,
        available: bool,
    }

    impl Target for PlainTarget {
        fn name(&self) -> &'static str {
            "plain"
        }

        fn check_dependencies(&self) -> Result<(), SyncError> {
            if self.available {
                Ok(())
            } else {
                Err(SyncError::MissingDependency {
                    target: "plain".into(),
                    dependency: "command 'plain'".into(),
                })
            }
        }

        fn directory(&self) -> &Path {
            &self.dir
        }

        fn suffix(&self) -> &'static str {
            "txt"
        }

        fn render(&self, artifacts: &[Artifact]) -> Result<Vec<FileArtifact>, SyncError> {
            Ok(artifacts
                .iter()
                .map(|a| FileArtifact::new(a.exec_command.clone(), a.file_path(&self.dir, self.suffix())))
                .collect())
        }
    }

    fn plain(dir: &TempDir, available: bool) -> Box<dyn Target> {
        Box::new(PlainTarget {
            dir: dir.path().to_path_buf(),
            available,
        })
    }

    #[test]
    fn pass_converges_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("boxprofile-distrobox-old.txt"), "old").unwrap();

        let outcomes = run(&FakeSource::with(&["arch"]), &[plain(&dir, true)], false).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(&outcomes[0], TargetOutcome::Synced(r) if r.reconcile.deleted.len() == 1));
        assert_eq!(
            fs::read_to_string(dir.path().join("boxprofile-distrobox-arch.txt")).unwrap(),
            "distrobox enter arch"
        );
        assert!(!dir.path().join("boxprofile-distrobox-old.txt").exists());
    }

    #[test]
    fn missing_source_fails_pass() {
        let dir = TempDir::new().unwrap();
        let mut source = FakeSource::with(&["arch"]);
        source.available = false;
        let err = run(&source, &[plain(&dir, true)], false).unwrap_err();
        assert!(matches!(err, SyncError::Source(SourceError::MissingDependency { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unavailable_target_is_skipped() {
        let skipped = TempDir::new().unwrap();
        let synced = TempDir::new().unwrap();
        let source = FakeSource::with(&["arch"]);
        let outcomes = run(&source, &[plain(&skipped, false), plain(&synced, true)], false).unwrap();

        assert!(matches!(outcomes[0], TargetOutcome::Skipped { .. }));
        assert!(matches!(outcomes[1], TargetOutcome::Synced(_)));
        assert_eq!(fs::read_dir(skipped.path()).unwrap().count(), 0);
        assert!(synced.path().join("boxprofile-distrobox-arch.txt").exists());
    }

    #[test]
    fn no_usable_targets_skips_enumeration() {
        let dir = TempDir::new().unwrap();
        let source = FakeSource::with(&["arch"]);
        let outcomes = run(&source, &[plain(&dir, false)], false).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].target(), "plain");
        assert_eq!(source.enumerated.get(), 0);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let outcomes = run(&FakeSource::with(&["arch"]), &[plain(&dir, true)], true).unwrap();
        assert!(matches!(&outcomes[0], TargetOutcome::Synced(r) if r.reconcile.dry_run));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
