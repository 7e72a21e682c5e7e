//! Minimal `key=value` settings-file reader.
//!
//! Only the first line starting with `key=` is considered. Anything that
//! goes wrong (missing file, unreadable file, key absent) yields `None`, so
//! callers fall back to a default instead of failing.

use std::path::Path;

/// Value of the first `key=value` line in `path`, trimmed.
pub fn read_value(path: &Path, key: &str) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    find_value(&contents, key)
}

/// Same as [`read_value`] over in-memory text.
pub fn find_value(contents: &str, key: &str) -> Option<String> {
    let prefix = format!("{key}=");
    contents
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(|value| value.trim().to_string())
}
