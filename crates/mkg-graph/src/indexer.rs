//! Vault scanning and per-note (re)indexing.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tracing::debug;

use mkg_core::error::{MkgError, Result};
use mkg_core::{notepath, wikilink};
use mkg_vault::Vault;

use crate::store::GraphState;

/// Storage collaborator seam: the indexer only ever needs note text on
/// demand plus a one-shot enumeration for the initial scan.
pub trait NoteSource {
    /// Note text for a vault-relative path. Fails with
    /// [`MkgError::NoteNotFound`] when the file is gone.
    fn read_note(&self, path: &str) -> Result<String>;

    /// Every note path currently in the collection, in no particular
    /// order.
    fn list_notes(&self) -> Result<Vec<String>>;
}

impl NoteSource for Vault {
    fn read_note(&self, path: &str) -> Result<String> {
        Vault::read_note(self, path)
    }

    fn list_notes(&self) -> Result<Vec<String>> {
        self.note_paths()
    }
}

/// Sole mutator of the [`GraphState`]: full scans, single-note
/// reindexing, and removal.
///
/// Each mutation is computed fully in memory before the state lock is
/// taken, so a concurrent reader never observes a half-applied update.
pub struct Indexer<S> {
    source: S,
    state: Arc<RwLock<GraphState>>,
}

impl<S: NoteSource> Indexer<S> {
    pub fn new(source: S, state: Arc<RwLock<GraphState>>) -> Self {
        Self { source, state }
    }

    /// Index every note the source enumerates, exactly once each.
    ///
    /// # Errors
    ///
    /// Fails only when enumeration or an actual read error occurs;
    /// vanished notes are skipped.
    pub fn scan(&self) -> Result<()> {
        let notes = self.source.list_notes()?;
        debug!("scanning {} notes", notes.len());
        for path in &notes {
            self.index_note(path)?;
        }
        Ok(())
    }

    /// (Re)index one note: register its path and swap its link set.
    ///
    /// A note that vanished between event delivery and read is nothing
    /// to index, not an error; the name's existing entry, if any, stays
    /// until a later event corrects it.
    ///
    /// # Errors
    ///
    /// Propagates read failures other than [`MkgError::NoteNotFound`].
    pub fn index_note(&self, path: &str) -> Result<()> {
        let text = match self.source.read_note(path) {
            Ok(text) => text,
            Err(MkgError::NoteNotFound(_)) => {
                debug!("note {path} vanished before read, skipping");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let name = notepath::note_name(path).to_string();
        let targets: HashSet<String> = wikilink::extract_links(&text);

        let mut state = self.write_state();
        state.paths.add(&name, path);
        state.links.set_links(&name, targets);
        Ok(())
    }

    /// Drop a name from the path table and both link directions.
    /// Idempotent; does not check whether other paths still share the
    /// name.
    pub fn remove_note(&self, name: &str) {
        let mut state = self.write_state();
        state.paths.remove_name(name);
        state.links.remove(name);
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, GraphState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
