//! Path table and link-graph store.
//!
//! Single source of truth for all link queries. Both maps are keyed by
//! bare note name, not path: when two paths share a name, the later
//! indexing pass silently overwrites the earlier one's forward links,
//! and removal drops the name outright. The path table is the only
//! place where duplicate basenames remain visible.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Maps a bare note name to every vault-relative path currently using
/// it. Insertion order is discovery order; it is only a last-resort
/// tie-break during resolution, never a correctness concern.
#[derive(Debug, Default)]
pub struct PathTable {
    paths: HashMap<String, Vec<String>>,
}

impl PathTable {
    /// Register a path for a name. Adding the same path twice is a no-op.
    pub fn add(&mut self, name: &str, path: &str) {
        let entry = self.paths.entry(name.to_string()).or_default();
        if !entry.iter().any(|p| p == path) {
            entry.push(path.to_string());
        }
    }

    /// Drop a name and all of its paths. Removing an absent name is a
    /// no-op.
    pub fn remove_name(&mut self, name: &str) {
        self.paths.remove(name);
    }

    /// Every path registered for `name`, in discovery order.
    #[must_use]
    pub fn all_paths(&self, name: &str) -> &[String] {
        self.paths.get(name).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of registered paths across all names.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.paths.values().map(Vec::len).sum()
    }
}

/// Forward links per name plus the derived backlink map.
///
/// Invariant, maintained by every mutation: for all names `a`, `b`,
/// `b ∈ forward(a)` if and only if `a ∈ backlinks(b)`.
#[derive(Debug, Default)]
pub struct LinkGraph {
    forward: HashMap<String, HashSet<String>>,
    backward: HashMap<String, HashSet<String>>,
}

impl LinkGraph {
    /// Replace `name`'s forward-link set in full, diffing backlink
    /// membership: every previous target loses `name` as a backlinker,
    /// every new target gains it.
    pub fn set_links(&mut self, name: &str, targets: HashSet<String>) {
        if let Some(old) = self.forward.remove(name) {
            self.unlink_from_targets(name, old);
        }
        for target in &targets {
            self.backward
                .entry(target.clone())
                .or_default()
                .insert(name.to_string());
        }
        self.forward.insert(name.to_string(), targets);
    }

    /// Drop a name from both directions. Idempotent.
    pub fn remove(&mut self, name: &str) {
        if let Some(old) = self.forward.remove(name) {
            self.unlink_from_targets(name, old);
        }
        self.backward.remove(name);
    }

    fn unlink_from_targets(&mut self, name: &str, targets: HashSet<String>) {
        for target in targets {
            if let Entry::Occupied(mut sources) = self.backward.entry(target) {
                sources.get_mut().remove(name);
                if sources.get().is_empty() {
                    sources.remove();
                }
            }
        }
    }

    /// Sorted forward links of `name`; empty when unknown.
    #[must_use]
    pub fn forward_links(&self, name: &str) -> Vec<String> {
        let mut links: Vec<String> = self
            .forward
            .get(name)
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        links.sort();
        links
    }

    /// Sorted backlinks of `name`; empty when nothing links to it.
    #[must_use]
    pub fn backlinks(&self, name: &str) -> Vec<String> {
        let mut sources: Vec<String> = self
            .backward
            .get(name)
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        sources.sort();
        sources
    }

    /// Total number of forward edges.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.forward.values().map(HashSet::len).sum()
    }

    pub(crate) fn forward_set(&self, name: &str) -> Option<&HashSet<String>> {
        self.forward.get(name)
    }

    pub(crate) fn backward_set(&self, name: &str) -> Option<&HashSet<String>> {
        self.backward.get(name)
    }
}

/// The mutable index state: path table plus link graph. Owned by the
/// indexer; queries only ever read it.
#[derive(Debug, Default)]
pub struct GraphState {
    pub(crate) paths: PathTable,
    pub(crate) links: LinkGraph,
}

impl GraphState {
    #[must_use]
    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    #[must_use]
    pub fn links(&self) -> &LinkGraph {
        &self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(targets: &[&str]) -> HashSet<String> {
        targets.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn path_table_preserves_insertion_order() {
        let mut table = PathTable::default();
        table.add("Index", "private/Index");
        table.add("Index", "Index");
        table.add("Index", "private/Index");

        assert_eq!(table.all_paths("Index"), ["private/Index", "Index"]);
        assert_eq!(table.path_count(), 2);
    }

    #[test]
    fn path_table_unknown_name_is_empty() {
        let table = PathTable::default();
        assert!(table.all_paths("Nope").is_empty());
    }

    #[test]
    fn set_links_builds_backlinks() {
        let mut graph = LinkGraph::default();
        graph.set_links("A", names(&["B", "C"]));

        assert_eq!(graph.forward_links("A"), ["B", "C"]);
        assert_eq!(graph.backlinks("B"), ["A"]);
        assert_eq!(graph.backlinks("C"), ["A"]);
    }

    #[test]
    fn set_links_replaces_not_merges() {
        let mut graph = LinkGraph::default();
        graph.set_links("A", names(&["B"]));
        graph.set_links("A", names(&["C"]));

        assert_eq!(graph.forward_links("A"), ["C"]);
        assert!(graph.backlinks("B").is_empty());
        assert_eq!(graph.backlinks("C"), ["A"]);
    }

    #[test]
    fn same_name_overwrites_previous_entry() {
        // Two paths sharing one name: the second indexing pass wins.
        // Accepted modeling limitation of name-keyed link entries.
        let mut graph = LinkGraph::default();
        graph.set_links("Index", names(&["Projects"]));
        graph.set_links("Index", names(&["Archive"]));

        assert_eq!(graph.forward_links("Index"), ["Archive"]);
        assert!(graph.backlinks("Projects").is_empty());
    }

    #[test]
    fn remove_prunes_both_directions() {
        let mut graph = LinkGraph::default();
        graph.set_links("A", names(&["B"]));
        graph.set_links("B", names(&["A"]));

        graph.remove("A");
        assert!(graph.forward_links("A").is_empty());
        assert!(graph.backlinks("B").is_empty());
        // B still links to the now-removed name; its forward set is kept.
        assert_eq!(graph.forward_links("B"), ["A"]);
        assert!(graph.backlinks("A").is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut graph = LinkGraph::default();
        graph.set_links("A", names(&["B"]));
        graph.remove("A");
        graph.remove("A");
        graph.remove("NeverExisted");
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn reindexing_same_content_reproduces_sets() {
        let mut graph = LinkGraph::default();
        graph.set_links("A", names(&["B", "C"]));
        let before = (graph.forward_links("A"), graph.backlinks("B"));

        graph.remove("A");
        graph.set_links("A", names(&["B", "C"]));
        let after = (graph.forward_links("A"), graph.backlinks("B"));

        assert_eq!(before, after);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Set(usize, Vec<usize>),
        Remove(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..6usize, proptest::collection::vec(0..6usize, 0..4))
                .prop_map(|(n, ts)| Op::Set(n, ts)),
            (0..6usize).prop_map(Op::Remove),
        ]
    }

    fn name(i: usize) -> String {
        format!("n{i}")
    }

    proptest! {
        #[test]
        fn backlink_symmetry_survives_any_op_sequence(
            ops in proptest::collection::vec(op_strategy(), 0..40)
        ) {
            let mut graph = LinkGraph::default();
            for op in ops {
                match op {
                    Op::Set(n, targets) => {
                        graph.set_links(&name(n), targets.into_iter().map(name).collect());
                    }
                    Op::Remove(n) => graph.remove(&name(n)),
                }
            }

            for (a, targets) in &graph.forward {
                for b in targets {
                    prop_assert!(
                        graph.backward.get(b).is_some_and(|s| s.contains(a)),
                        "missing backlink {b} -> {a}"
                    );
                }
            }
            for (b, sources) in &graph.backward {
                prop_assert!(!sources.is_empty(), "empty backlink set kept for {b}");
                for a in sources {
                    prop_assert!(
                        graph.forward.get(a).is_some_and(|t| t.contains(b)),
                        "stale backlink {b} -> {a}"
                    );
                }
            }
        }
    }
}
