//! Domain types for generated launch profiles.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! [`ManifestEntry`] is serializable via serde + serde_yaml; [`Artifact`] is
//! never persisted directly.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Fixed prefix of every generated file name.
///
/// Files look like `boxprofile-<source>-<name>.<suffix>`.
pub const FILE_PREFIX: &str = "boxprofile";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for one artifact (e.g. a container name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactName(pub String);

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ArtifactName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArtifactName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The kind of upstream source an artifact came from (e.g. `distrobox`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceKind(pub String);

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SourceKind {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SourceKind {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// One desired launch shortcut, before it is rendered for a target.
///
/// `(source, name)` identifies the artifact within a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: ArtifactName,
    pub source: SourceKind,
    pub icon: Option<PathBuf>,
    pub exec_command: String,
}

impl Artifact {
    pub fn new(
        name: impl Into<ArtifactName>,
        source: impl Into<SourceKind>,
        icon: Option<PathBuf>,
        exec_command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            icon,
            exec_command: exec_command.into(),
        }
    }

    /// `<source>-<name>`, used for file names and internal identification.
    pub fn root_name(&self) -> String {
        format!("{}-{}", self.source, self.name)
    }

    /// `boxprofile-<source>-<name>.<suffix>`
    pub fn file_name(&self, suffix: &str) -> String {
        format!("{FILE_PREFIX}-{}.{suffix}", self.root_name())
    }

    /// Full path of the rendered file inside `directory`.
    pub fn file_path(&self, directory: &Path, suffix: &str) -> PathBuf {
        directory.join(self.file_name(suffix))
    }

    /// Display name shown in the terminal's UI.
    pub fn friendly_name(&self) -> String {
        format!("{} – {}", self.source, self.name)
    }

    /// Glob matching every file name [`Artifact::file_name`] can produce for `suffix`.
    pub fn file_glob(suffix: &str) -> String {
        format!("{FILE_PREFIX}-*-*.{suffix}")
    }

    pub fn to_manifest_entry(&self) -> ManifestEntry {
        ManifestEntry {
            name: self.name.0.clone(),
            source: self.source.0.clone(),
            exec: self.exec_command.clone(),
            icon: self.icon.clone(),
        }
    }

    pub fn from_manifest_entry(entry: &ManifestEntry) -> Self {
        Self {
            name: ArtifactName::from(entry.name.as_str()),
            source: SourceKind::from(entry.source.as_str()),
            icon: entry.icon.clone(),
            exec_command: entry.exec.clone(),
        }
    }
}

impl From<&Artifact> for ManifestEntry {
    fn from(artifact: &Artifact) -> Self {
        artifact.to_manifest_entry()
    }
}

impl From<&ManifestEntry> for Artifact {
    fn from(entry: &ManifestEntry) -> Self {
        Artifact::from_manifest_entry(entry)
    }
}

// ---------------------------------------------------------------------------
// Materialized forms
// ---------------------------------------------------------------------------

/// Rendered file content plus its absolute destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifact {
    pub content: String,
    pub path: PathBuf,
}

impl FileArtifact {
    pub fn new(content: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            content: content.into(),
            path: path.into(),
        }
    }
}

/// One manifest record. `icon` is omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub source: String,
    pub exec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ubuntu() -> Artifact {
        Artifact::new("ubuntu-box", "distrobox", None, "distrobox enter ubuntu-box")
    }

    #[test]
    fn newtype_display() {
        assert_eq!(ArtifactName::from("foo").to_string(), "foo");
        assert_eq!(SourceKind::from("distrobox").to_string(), "distrobox");
    }

    #[test]
    fn derived_names() {
        let a = ubuntu();
        assert_eq!(a.root_name(), "distrobox-ubuntu-box");
        assert_eq!(a.file_name("profile"), "boxprofile-distrobox-ubuntu-box.profile");
        assert_eq!(a.friendly_name(), "distrobox – ubuntu-box");
    }

    #[test]
    fn file_path_joins_directory() {
        let path = ubuntu().file_path(Path::new("/home/u/.local/share/konsole"), "profile");
        assert_eq!(
            path,
            PathBuf::from("/home/u/.local/share/konsole/boxprofile-distrobox-ubuntu-box.profile")
        );
    }

    #[test]
    fn file_glob_shape() {
        assert_eq!(Artifact::file_glob("profile"), "boxprofile-*-*.profile");
    }

    #[test]
    fn manifest_entry_omits_missing_icon() {
        let yaml = serde_yaml::to_string(&ubuntu().to_manifest_entry()).expect("serialize");
        assert!(!yaml.contains("icon"), "icon key must be omitted, got:\n{yaml}");
        assert!(yaml.contains("exec: distrobox enter ubuntu-box"));
    }

    #[test]
    fn manifest_entry_keeps_present_icon() {
        let mut a = ubuntu();
        a.icon = Some(PathBuf::from("/icons/ubuntu.svg"));
        let yaml = serde_yaml::to_string(&a.to_manifest_entry()).expect("serialize");
        assert!(yaml.contains("icon: /icons/ubuntu.svg"));
    }

    #[test]
    fn manifest_entry_without_icon_key_parses_as_none() {
        let entry: ManifestEntry =
            serde_yaml::from_str("name: fedora\nsource: distrobox\nexec: distrobox enter fedora\n")
                .expect("parse");
        assert!(entry.icon.is_none());
        let back = Artifact::from(&entry);
        assert_eq!(back.name, ArtifactName::from("fedora"));
        assert_eq!(back.exec_command, "distrobox enter fedora");
    }

    #[test]
    fn artifact_survives_manifest_entry() {
        let mut a = ubuntu();
        a.icon = Some(PathBuf::from("/icons/ubuntu.png"));
        let entry = ManifestEntry::from(&a);
        assert_eq!(Artifact::from_manifest_entry(&entry), a);
    }
}
