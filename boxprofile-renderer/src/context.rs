//! Template context: serializable rendering payload built from an [`Artifact`].

use serde::{Deserialize, Serialize};

use boxprofile_core::Artifact;

use crate::error::RenderError;

/// Flat rendering payload for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileContext {
    /// Command line the terminal runs when the profile opens.
    pub command: String,
    /// Icon path, rendered only when present.
    pub icon: Option<String>,
    /// Display name shown in the terminal UI.
    pub name: String,
    /// Parent profile reference.
    pub parent: String,
}

impl ProfileContext {
    /// Build a [`ProfileContext`] from an [`Artifact`] and a resolved parent.
    pub fn from_artifact(artifact: &Artifact, parent: impl Into<String>) -> Self {
        ProfileContext {
            command: artifact.exec_command.clone(),
            icon: artifact
                .icon
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            name: artifact.friendly_name(),
            parent: parent.into(),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
