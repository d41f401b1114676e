//! Bounded breadth-first traversal of the link graph.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::resolver::ResolverPolicy;
use crate::store::LinkGraph;

/// How a neighbor was first reached from the expanding node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirection {
    Forward,
    Backward,
    Both,
}

/// A node in the neighborhood of a query note.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborInfo {
    /// Hop count from the start note, `1..=max_depth`.
    pub distance: u32,
    pub direction: LinkDirection,
    /// The node's own immediate forward links — not relative to the
    /// start note.
    pub direct_links: Vec<String>,
    /// The node's own immediate backlinks, low-priority names filtered
    /// unless requested.
    pub backlinks: Vec<String>,
}

/// Collect every note within `max_depth` hops of `name`, in either link
/// direction. The start note itself is never part of the result; nodes
/// at `max_depth` are reported but not expanded further.
///
/// Standard visited-set BFS: a node is annotated once, at first
/// discovery. Backlink expansion skips names under the low-priority
/// folder prefix unless `include_low_priority` is set.
#[must_use]
pub fn neighborhood(
    graph: &LinkGraph,
    policy: &ResolverPolicy,
    name: &str,
    max_depth: u32,
    include_low_priority: bool,
) -> HashMap<String, NeighborInfo> {
    let mut result: HashMap<String, NeighborInfo> = HashMap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, u32)> = VecDeque::new();

    visited.insert(name.to_string());
    queue.push_back((name.to_string(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let forward = graph.forward_set(&current);
        let backward = graph.backward_set(&current);

        let mut discovered: Vec<(String, LinkDirection)> = Vec::new();
        if let Some(targets) = forward {
            for target in targets {
                let both = backward.is_some_and(|sources| sources.contains(target));
                let direction = if both {
                    LinkDirection::Both
                } else {
                    LinkDirection::Forward
                };
                discovered.push((target.clone(), direction));
            }
        }
        if let Some(sources) = backward {
            for source in sources {
                if !include_low_priority && policy.is_low_priority(source) {
                    continue;
                }
                // Already recorded as Both via the forward pass.
                if forward.is_some_and(|targets| targets.contains(source)) {
                    continue;
                }
                discovered.push((source.clone(), LinkDirection::Backward));
            }
        }

        for (neighbor, direction) in discovered {
            if !visited.insert(neighbor.clone()) {
                continue;
            }
            result.insert(
                neighbor.clone(),
                NeighborInfo {
                    distance: depth + 1,
                    direction,
                    direct_links: graph.forward_links(&neighbor),
                    backlinks: filtered_backlinks(graph, policy, &neighbor, include_low_priority),
                },
            );
            queue.push_back((neighbor, depth + 1));
        }
    }

    result
}

/// Backlinks of `name` with the low-priority prefix filter applied.
pub(crate) fn filtered_backlinks(
    graph: &LinkGraph,
    policy: &ResolverPolicy,
    name: &str,
    include_low_priority: bool,
) -> Vec<String> {
    let mut sources: Vec<String> = graph
        .backward_set(name)
        .into_iter()
        .flatten()
        .filter(|s| include_low_priority || !policy.is_low_priority(s))
        .cloned()
        .collect();
    sources.sort();
    sources
}
