//! Artifact sources for `boxprofile-source`.
//!
//! A [`Source`] enumerates the things that deserve a terminal profile. The
//! only implementation today is [`DistroboxSource`], which parses the table
//! printed by `distrobox list`:
//!
//! ```text
//! ID           | NAME       | STATUS        | IMAGE
//! 1a2b3c4d5e6f | ubuntu-box | Up 2 hours    | quay.io/toolbx/ubuntu-toolbox:24.04
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use boxprofile_core::{paths, Artifact};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One row of a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    pub name: String,
    pub image: String,
}

/// Errors from enumerating a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("required command '{command}' was not found in PATH")]
    MissingDependency { command: String },

    #[error("I/O error running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// An upstream enumerator of artifacts.
pub trait Source {
    /// Identifying name, also used as the artifacts' [`SourceKind`].
    ///
    /// [`SourceKind`]: boxprofile_core::SourceKind
    fn name(&self) -> &'static str;

    /// `Ok(())` when every external command the source needs is available.
    fn check_dependencies(&self) -> Result<(), SourceError>;

    /// Current desired artifacts, in listing order.
    fn enumerate(&self) -> Result<Vec<Artifact>, SourceError>;
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `true` if `command` resolves to an executable (bare name via `PATH`, or a path).
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}

const NAME_COLUMN: usize = 1;
const IMAGE_COLUMN: usize = 3;

/// Parse `distrobox list` output. The first line is a header and is skipped.
///
/// Rows with too few `|`-separated cells are skipped with a warning rather
/// than failing the whole listing.
pub fn parse_listing(output: &str) -> Vec<ContainerEntry> {
    let mut entries = Vec::new();
    for line in output.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('|').map(str::trim).collect();
        if cells.len() <= IMAGE_COLUMN || cells[NAME_COLUMN].is_empty() {
            tracing::warn!("distrobox: skipping malformed listing row: {line:?}");
            continue;
        }
        entries.push(ContainerEntry {
            name: cells[NAME_COLUMN].to_string(),
            image: cells[IMAGE_COLUMN].to_string(),
        });
    }
    entries
}

/// Base name of an image reference: registry path and tag stripped.
///
/// `quay.io/toolbx/ubuntu-toolbox:24.04` → `ubuntu-toolbox`
pub fn image_stem(image: &str) -> &str {
    let last = image.rsplit('/').next().unwrap_or(image);
    last.split(':').next().unwrap_or(last)
}

/// Find an icon in `icons_dir` whose file stem equals the image's base name.
///
/// Entries are checked in sorted order so the choice is deterministic when
/// several extensions exist. Returns `None` if the directory is missing.
pub fn find_icon(icons_dir: &Path, image: &str) -> Option<PathBuf> {
    let stem = image_stem(image);
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(icons_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .find(|p| p.file_stem().and_then(|s| s.to_str()) == Some(stem))
}

// ---------------------------------------------------------------------------
// Distrobox
// ---------------------------------------------------------------------------

/// Distrobox containers, one artifact per container.
#[derive(Debug, Clone)]
pub struct DistroboxSource {
    program: String,
    icons_dir: PathBuf,
}

impl DistroboxSource {
    pub const NAME: &'static str = "distrobox";

    /// Source using `distrobox` from `PATH` and the icons under `home`.
    pub fn at(home: &Path) -> Self {
        Self {
            program: Self::NAME.to_string(),
            icons_dir: paths::distrobox_icons_dir(home),
        }
    }

    /// Replace the listing program (absolute path or bare command name).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    fn list(&self) -> Result<String, SourceError> {
        let output = Command::new(&self.program)
            .arg("list")
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SourceError::MissingDependency {
                    command: self.program.clone(),
                },
                _ => SourceError::Io {
                    command: self.program.clone(),
                    source: e,
                },
            })?;
        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                command: format!("{} list", self.program),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Turn parsed rows into artifacts, resolving icons.
    pub fn artifacts_from(&self, entries: &[ContainerEntry]) -> Vec<Artifact> {
        entries
            .iter()
            .map(|e| {
                Artifact::new(
                    e.name.as_str(),
                    Self::NAME,
                    find_icon(&self.icons_dir, &e.image),
                    format!("distrobox enter {}", e.name),
                )
            })
            .collect()
    }
}

impl Source for DistroboxSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_dependencies(&self) -> Result<(), SourceError> {
        if command_exists(&self.program) {
            Ok(())
        } else {
            Err(SourceError::MissingDependency {
                command: self.program.clone(),
            })
        }
    }

    fn enumerate(&self) -> Result<Vec<Artifact>, SourceError> {
        let listing = self.list()?;
        let entries = parse_listing(&listing);
        tracing::info!("distrobox: found {} container(s)", entries.len());
        for e in &entries {
            tracing::info!("  - {}", e.name);
        }
        Ok(self.artifacts_from(&entries))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
