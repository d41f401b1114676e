//! Helpers for vault-relative note paths.
//!
//! A note path is the vault-relative path of a note file without its
//! extension, `/`-separated on every platform (e.g. `knowledge/Rust`).
//! The bare note name is the last path segment and is not unique across
//! the vault. Conversion to and from filesystem paths happens only here.

use std::path::{Path, PathBuf};

/// The bare note name: the last segment of a note path.
#[must_use]
pub fn note_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether the path has no folder component.
#[must_use]
pub fn is_root_level(path: &str) -> bool {
    !path.contains('/')
}

/// Whether the path sits under `folder` (at any depth).
#[must_use]
pub fn in_folder(path: &str, folder: &str) -> bool {
    path.strip_prefix(folder)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some()
}

/// Filesystem path for a note path, built segment by segment so the
/// `/` separators never leak into platform paths.
#[must_use]
pub fn to_file_path(root: &Path, path: &str, extension: &str) -> PathBuf {
    let mut file = root.to_path_buf();
    let mut segments = path.split('/').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            file.push(format!("{segment}.{extension}"));
        } else {
            file.push(segment);
        }
    }
    file
}

/// Note path for a file under `root`, or `None` when the file is outside
/// the root, has the wrong extension, or is not valid UTF-8.
#[must_use]
pub fn to_note_path(root: &Path, file: &Path, extension: &str) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    if rel.extension().and_then(|e| e.to_str()) != Some(extension) {
        return None;
    }
    let stem = rel.with_extension("");
    let mut segments = Vec::new();
    for component in stem.components() {
        segments.push(component.as_os_str().to_str()?);
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}
