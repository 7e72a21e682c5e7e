//! Targets: applications that consume generated profile files.
//!
//! A [`Target`] renders artifacts into [`FileArtifact`]s for one directory;
//! the provided [`Target::materialize`] records the manifest and then runs
//! the tree reconciler over that directory.

use std::path::{Path, PathBuf};

use boxprofile_core::{paths, Artifact, FileArtifact};
use boxprofile_renderer::{settings, ProfileContext, ProfileFormat, Renderer};

use crate::error::SyncError;
use crate::manifest::write_manifest;
use crate::reconcile::{reconcile, ReconcileReport};
use crate::writer::WriteResult;

/// Names accepted by [`targets_for_query`], besides `all`.
pub const TARGET_NAMES: &[&str] = &[KonsoleTarget::NAME];

/// Outcome of materializing one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: String,
    pub manifest: WriteResult,
    pub reconcile: ReconcileReport,
}

/// A downstream consumer of artifacts.
pub trait Target {
    /// Identifying name (`konsole`).
    fn name(&self) -> &'static str;

    /// `Ok(())` when the target application and its directory are present.
    fn check_dependencies(&self) -> Result<(), SyncError>;

    /// Directory holding this target's generated files.
    fn directory(&self) -> &Path;

    /// File suffix of generated files, without the dot.
    fn suffix(&self) -> &'static str;

    /// Render every artifact into its file form.
    fn render(&self, artifacts: &[Artifact]) -> Result<Vec<FileArtifact>, SyncError>;

    /// Glob matching every file this target manages in [`Target::directory`].
    fn glob(&self) -> String {
        Artifact::file_glob(self.suffix())
    }

    /// Record the manifest, then converge the directory to `artifacts`.
    fn materialize(&self, artifacts: &[Artifact], dry_run: bool) -> Result<TargetReport, SyncError> {
        let files = self.render(artifacts)?;
        let manifest = write_manifest(self.directory(), self.name(), artifacts, dry_run)?;
        let reconcile = reconcile(self.directory(), &self.glob(), &files, dry_run)?;
        Ok(TargetReport {
            target: self.name().to_string(),
            manifest,
            reconcile,
        })
    }
}

// ---------------------------------------------------------------------------
// Konsole
// ---------------------------------------------------------------------------

/// KDE Konsole: `.profile` files in `~/.local/share/konsole`.
pub struct KonsoleTarget {
    profiles_dir: PathBuf,
    rc_file: PathBuf,
    program: String,
    renderer: Renderer,
}

impl KonsoleTarget {
    pub const NAME: &'static str = "konsole";

    const DEFAULT_PROFILE_KEY: &'static str = "DefaultProfile";

    /// Konsole target rooted at `home`, honouring user template overrides.
    pub fn at(home: &Path) -> Result<Self, SyncError> {
        Ok(Self {
            profiles_dir: paths::konsole_profiles_dir(home),
            rc_file: paths::konsolerc_path(home),
            program: Self::NAME.to_string(),
            renderer: Renderer::with_overrides(&paths::templates_dir(home))?,
        })
    }

    /// Replace the program checked by [`Target::check_dependencies`].
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn rc_file(&self) -> &Path {
        &self.rc_file
    }

    /// Parent profile of generated profiles: the user's default Konsole
    /// profile, or [`paths::FALLBACK_PARENT`] when it cannot be determined.
    pub fn parent_profile(&self) -> String {
        match settings::read_value(&self.rc_file, Self::DEFAULT_PROFILE_KEY) {
            Some(name) if !name.is_empty() => self.profiles_dir.join(name).display().to_string(),
            _ => paths::FALLBACK_PARENT.to_string(),
        }
    }
}

impl Target for KonsoleTarget {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_dependencies(&self) -> Result<(), SyncError> {
        if which::which(&self.program).is_err() {
            return Err(SyncError::MissingDependency {
                target: Self::NAME.to_string(),
                dependency: format!("command '{}'", self.program),
            });
        }
        if !self.profiles_dir.is_dir() {
            return Err(SyncError::MissingDependency {
                target: Self::NAME.to_string(),
                dependency: format!("directory {}", self.profiles_dir.display()),
            });
        }
        Ok(())
    }

    fn directory(&self) -> &Path {
        &self.profiles_dir
    }

    fn suffix(&self) -> &'static str {
        ProfileFormat::Konsole.suffix()
    }

    fn render(&self, artifacts: &[Artifact]) -> Result<Vec<FileArtifact>, SyncError> {
        let parent = self.parent_profile();
        artifacts
            .iter()
            .map(|a| -> Result<FileArtifact, SyncError> {
                let ctx = ProfileContext::from_artifact(a, parent.as_str());
                let content = self.renderer.render(ProfileFormat::Konsole, &ctx)?;
                Ok(FileArtifact::new(content, a.file_path(&self.profiles_dir, self.suffix())))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Targets selected by `query`: `all` selects every target, otherwise each
/// name must be one of [`TARGET_NAMES`].
pub fn targets_for_query(home: &Path, query: &[String]) -> Result<Vec<Box<dyn Target>>, SyncError> {
    if let Some(unknown) = query
        .iter()
        .find(|q| q.as_str() != "all" && !TARGET_NAMES.contains(&q.as_str()))
    {
        return Err(SyncError::UnknownTarget(unknown.clone()));
    }

    let all: Vec<Box<dyn Target>> = vec![Box::new(KonsoleTarget::at(home)?)];
    if query.iter().any(|q| q == "all") {
        return Ok(all);
    }
    Ok(all
        .into_iter()
        .filter(|t| query.iter().any(|q| q == t.name()))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
