//! Well-known locations, all rooted at an explicit `home`.
//!
//! Every helper takes `home: &Path` so tests can point them at a `TempDir`;
//! [`home`] resolves the real one via `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// Name of the manifest written into every target directory.
pub const MANIFEST_FILE: &str = "boxprofile-manifest.yaml";

/// Parent value used when the terminal's default profile cannot be resolved.
pub const FALLBACK_PARENT: &str = "FALLBACK/";

/// `<home>/.local/share/konsole`
pub fn konsole_profiles_dir(home: &Path) -> PathBuf {
    home.join(".local").join("share").join("konsole")
}

/// `<home>/.config/konsolerc`
pub fn konsolerc_path(home: &Path) -> PathBuf {
    home.join(".config").join("konsolerc")
}

/// `<home>/.local/share/icons/distrobox`
pub fn distrobox_icons_dir(home: &Path) -> PathBuf {
    home.join(".local").join("share").join("icons").join("distrobox")
}

/// `<home>/.config/boxprofile/templates`: optional user template overrides.
pub fn templates_dir(home: &Path) -> PathBuf {
    home.join(".config").join("boxprofile").join("templates")
}

/// `<dir>/boxprofile-manifest.yaml`: pure, no I/O.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

/// The current user's home directory.
pub fn home() -> Result<PathBuf, ManifestError> {
    dirs::home_dir().ok_or(ManifestError::HomeNotFound)
}
