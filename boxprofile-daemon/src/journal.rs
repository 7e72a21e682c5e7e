//! Podman container events from the systemd journal.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::error::{io_err, DaemonError};

pub const JOURNALCTL: &str = "journalctl";
pub const PODMAN: &str = "podman";

/// A journal line that mentions a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerEvent {
    Created,
    Removed,
    Other,
}

/// `None` for lines that do not mention a container.
pub fn classify(line: &str) -> Option<ContainerEvent> {
    if !line.contains("container") {
        return None;
    }
    if line.contains("create") {
        Some(ContainerEvent::Created)
    } else if line.contains("remove") {
        Some(ContainerEvent::Removed)
    } else {
        Some(ContainerEvent::Other)
    }
}

/// Resolve both commands the watch loop needs; returns the podman path,
/// which identifies its journal entries.
pub fn resolve(journalctl: &str, podman: &str) -> Result<PathBuf, DaemonError> {
    which::which(journalctl).map_err(|_| DaemonError::MissingDependency {
        command: journalctl.to_string(),
    })?;
    which::which(podman).map_err(|_| DaemonError::MissingDependency {
        command: podman.to_string(),
    })
}

/// `journalctl --follow --lines 0 <podman>` with stdout piped.
///
/// The child is killed when its handle is dropped.
pub fn spawn_follow(journalctl: &str, podman: &Path) -> Result<Child, DaemonError> {
    Command::new(journalctl)
        .arg("--follow")
        .arg("--lines")
        .arg("0")
        .arg(podman)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| io_err(journalctl, e))
}
