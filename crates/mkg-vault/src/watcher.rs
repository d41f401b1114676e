//! File system watcher for incremental reindexing.
//!
//! Uses the `notify` crate for cross-platform file system events
//! (FSEvents on macOS, inotify on Linux, ReadDirectoryChanges on
//! Windows). Raw events are filtered and translated into [`NoteEvent`]s
//! carrying vault-relative note paths, then handed to a subscriber
//! callback — consumers never see the underlying watcher library.

use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::warn;

use mkg_core::error::{MkgError, Result};
use mkg_core::notepath;

use crate::VaultConfig;

/// A change to a single note. The payload is the vault-relative note
/// path without extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    /// A note file was created.
    Added(String),
    /// A note file's content changed.
    Changed(String),
    /// A note file was deleted.
    Removed(String),
}

impl NoteEvent {
    /// The note path the event refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Added(p) | Self::Changed(p) | Self::Removed(p) => p,
        }
    }
}

/// Watches a vault directory and forwards note changes to a handler.
///
/// Filtering matches [`Vault::note_paths`](crate::Vault::note_paths):
/// only files with the note extension, never inside hidden or reserved
/// directories. Dropping the watcher stops delivery.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
}

impl VaultWatcher {
    /// Start watching `root`, invoking `on_event` for every note change.
    ///
    /// The handler runs on the watcher's own thread; hand events off to
    /// a queue if processing is not trivially short.
    ///
    /// # Errors
    ///
    /// Returns [`MkgError::Watch`] if the watcher cannot be created or
    /// attached to `root`.
    pub fn start<F>(root: &Path, config: &VaultConfig, mut on_event: F) -> Result<Self>
    where
        F: FnMut(NoteEvent) + Send + 'static,
    {
        let root = root.to_path_buf();
        let watch_root = root.clone();
        let config = config.clone();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for path in &event.paths {
                        if in_excluded_dir(&root, path, &config) {
                            continue;
                        }
                        let Some(note) = notepath::to_note_path(&root, path, &config.extension)
                        else {
                            continue;
                        };
                        let note_event = match event.kind {
                            EventKind::Create(_) => NoteEvent::Added(note),
                            EventKind::Modify(_) => NoteEvent::Changed(note),
                            EventKind::Remove(_) => NoteEvent::Removed(note),
                            _ => continue,
                        };
                        on_event(note_event);
                    }
                }
                Err(e) => warn!("watch error: {e}"),
            },
        )
        .map_err(|e| MkgError::Watch(e.to_string()))?;

        watcher
            .watch(&watch_root, RecursiveMode::Recursive)
            .map_err(|e| MkgError::Watch(e.to_string()))?;

        Ok(Self { _watcher: watcher })
    }
}

fn in_excluded_dir(root: &Path, path: &Path, config: &VaultConfig) -> bool {
    let Ok(rel) = path.strip_prefix(root) else {
        return false;
    };
    rel.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_none_or(|s| s.starts_with('.') || s == config.config_dir)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use std::time::Duration;

    fn start_collecting(root: &Path) -> (VaultWatcher, mpsc::Receiver<NoteEvent>) {
        let (tx, rx) = mpsc::channel();
        let watcher = VaultWatcher::start(root, &VaultConfig::default(), move |event| {
            let _ = tx.send(event);
        })
        .unwrap();
        (watcher, rx)
    }

    #[test]
    fn watcher_detects_new_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("projects")).unwrap();
        let (_watcher, rx) = start_collecting(dir.path());

        fs::write(dir.path().join("projects").join("test.md"), "# Test").unwrap();

        // Some platforms emit Modify alongside Create; accept either kind
        // as long as it names the new note.
        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(event.path(), "projects/test");
        assert!(!matches!(event, NoteEvent::Removed(_)));
    }

    #[test]
    fn watcher_detects_modification() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("existing.md");
        fs::write(&file, "original").unwrap();

        let (_watcher, rx) = start_collecting(dir.path());
        std::thread::sleep(Duration::from_millis(100));
        fs::write(&file, "modified").unwrap();

        let mut found = false;
        for _ in 0..10 {
            match rx.recv_timeout(Duration::from_secs(2)) {
                Ok(NoteEvent::Changed(path)) if path == "existing" => {
                    found = true;
                    break;
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }
        assert!(found, "expected a Changed event for the modified note");
    }

    #[test]
    fn watcher_detects_deletion() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("to-delete.md");
        fs::write(&file, "# Delete Me").unwrap();

        let (_watcher, rx) = start_collecting(dir.path());
        std::thread::sleep(Duration::from_millis(100));
        fs::remove_file(&file).unwrap();

        // FSEvents may emit Changed before Removed; drain until Removed.
        let mut found = false;
        for _ in 0..10 {
            match rx.recv_timeout(Duration::from_secs(2)) {
                Ok(NoteEvent::Removed(path)) => {
                    assert_eq!(path, "to-delete");
                    found = true;
                    break;
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }
        assert!(found, "expected watcher to emit a Removed event");
    }

    #[test]
    fn watcher_ignores_non_notes_and_hidden_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".mkg")).unwrap();
        let (_watcher, rx) = start_collecting(dir.path());

        fs::write(dir.path().join("notes.txt"), "plain text").unwrap();
        fs::write(dir.path().join(".mkg").join("cache.md"), "config").unwrap();

        assert!(
            rx.recv_timeout(Duration::from_millis(500)).is_err(),
            "non-note and reserved-directory files must not produce events"
        );
    }
}
