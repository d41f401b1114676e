//! The incremental update pipeline and its query surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use mkg_core::error::Result;
use mkg_core::notepath;
use mkg_vault::watcher::NoteEvent;

use crate::indexer::{Indexer, NoteSource};
use crate::neighborhood::{self, NeighborInfo};
use crate::resolver::ResolverPolicy;
use crate::store::GraphState;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Handle for feeding note events into a running [`GraphService`].
///
/// Cloneable; typically moved into a watcher callback. Every pushed
/// event counts as pending until the worker has fully applied it.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<NoteEvent>,
    pending: Arc<AtomicUsize>,
}

impl EventSink {
    pub fn push(&self, event: NoteEvent) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(event).is_err() {
            // Worker is gone (disposed): the event is dropped, not pending.
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Live link-graph index over one note collection.
///
/// [`GraphService::start`] scans the whole collection synchronously,
/// then spawns a worker that applies incoming events serially, in
/// arrival order. The returned [`EventSink`] cannot exist before the
/// scan has finished, so no event is ever interleaved with initial
/// population. Queries run over shared in-memory state and always see
/// every fully-applied event; they never see a half-applied one.
pub struct GraphService {
    state: Arc<RwLock<GraphState>>,
    policy: ResolverPolicy,
    pending: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl GraphService {
    /// Scan `source` in full, then start consuming events.
    ///
    /// # Errors
    ///
    /// Fails when the initial enumeration fails; individually vanished
    /// notes are skipped, not errors.
    pub fn start<S>(source: S, policy: ResolverPolicy) -> Result<(Self, EventSink)>
    where
        S: NoteSource + Send + 'static,
    {
        let state = Arc::new(RwLock::new(GraphState::default()));
        let indexer = Indexer::new(source, Arc::clone(&state));
        indexer.scan()?;

        let pending = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker = {
            let pending = Arc::clone(&pending);
            let stop = Arc::clone(&stop);
            thread::spawn(move || run_worker(&indexer, &rx, &pending, &stop))
        };
        info!("initial scan complete, applying incremental updates");

        let sink = EventSink {
            tx,
            pending: Arc::clone(&pending),
        };
        let service = Self {
            state,
            policy,
            pending,
            stop,
            worker: Some(worker),
        };
        Ok((service, sink))
    }

    /// Every path currently registered for `name`, in discovery order.
    #[must_use]
    pub fn all_paths(&self, name: &str) -> Vec<String> {
        self.read_state().paths().all_paths(name).to_vec()
    }

    /// The canonical path for `name` under the folder-priority policy,
    /// or `None` for an unknown name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<String> {
        let state = self.read_state();
        self.policy.resolve(state.paths(), name).map(str::to_string)
    }

    /// Sorted outgoing links of `name`.
    #[must_use]
    pub fn forward_links(&self, name: &str) -> Vec<String> {
        self.read_state().links().forward_links(name)
    }

    /// Sorted names linking to `name`, low-priority linkers filtered
    /// unless requested.
    #[must_use]
    pub fn backlinks(&self, name: &str, include_low_priority: bool) -> Vec<String> {
        let state = self.read_state();
        neighborhood::filtered_backlinks(state.links(), &self.policy, name, include_low_priority)
    }

    /// Notes within `max_depth` hops of `name`, annotated with distance
    /// and direction.
    #[must_use]
    pub fn neighborhood(
        &self,
        name: &str,
        max_depth: u32,
        include_low_priority: bool,
    ) -> HashMap<String, NeighborInfo> {
        let state = self.read_state();
        neighborhood::neighborhood(
            state.links(),
            &self.policy,
            name,
            max_depth,
            include_low_priority,
        )
    }

    /// Number of distinct note names in the index.
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.read_state().paths().name_count()
    }

    /// Number of registered paths across all names.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.read_state().paths().path_count()
    }

    /// Total number of forward edges in the graph.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.read_state().links().link_count()
    }

    /// Whether any event-triggered index mutation is still in flight.
    ///
    /// Callers doing read-after-write poll this and apply their own
    /// stability window; the pipeline itself emits no "done" signal.
    #[must_use]
    pub fn has_pending_operations(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Stop consuming events. Safe to call any number of times; events
    /// pushed afterwards are dropped.
    pub fn dispose(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("pipeline worker panicked");
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, GraphState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GraphService {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn run_worker<S: NoteSource>(
    indexer: &Indexer<S>,
    rx: &mpsc::Receiver<NoteEvent>,
    pending: &AtomicUsize,
    stop: &AtomicBool,
) {
    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                apply(indexer, event);
                pending.fetch_sub(1, Ordering::SeqCst);
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn apply<S: NoteSource>(indexer: &Indexer<S>, event: NoteEvent) {
    match event {
        NoteEvent::Added(path) | NoteEvent::Changed(path) => {
            if let Err(e) = indexer.index_note(&path) {
                warn!("failed to reindex {path}: {e}");
            }
        }
        NoteEvent::Removed(path) => {
            indexer.remove_note(notepath::note_name(&path));
        }
    }
}
