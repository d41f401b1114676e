//! Folder-priority resolution of ambiguous note names.

use mkg_core::notepath;

use crate::store::PathTable;

/// Folder priorities used to pick one canonical path for a name.
///
/// Resolution is a strict, ordered, first-match policy — not a score:
/// 1. a root-level path,
/// 2. a path under the primary folder,
/// 3. a path under the secondary folder,
/// 4. any path outside the low-priority folder,
/// 5. any remaining path.
///
/// Rule 5 guarantees a result whenever the name has paths at all. Within
/// one rule, discovery order breaks ties.
#[derive(Debug, Clone)]
pub struct ResolverPolicy {
    pub primary_folder: String,
    pub secondary_folder: String,
    pub low_priority_folder: String,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            primary_folder: "knowledge".to_string(),
            secondary_folder: "journal".to_string(),
            low_priority_folder: "private".to_string(),
        }
    }
}

impl ResolverPolicy {
    /// The canonical path for `name`, or `None` when the name is
    /// unknown. Deterministic as long as the underlying path list is
    /// unchanged.
    #[must_use]
    pub fn resolve<'a>(&self, table: &'a PathTable, name: &str) -> Option<&'a str> {
        let paths = table.all_paths(name);
        paths
            .iter()
            .find(|p| notepath::is_root_level(p))
            .or_else(|| {
                paths
                    .iter()
                    .find(|p| notepath::in_folder(p, &self.primary_folder))
            })
            .or_else(|| {
                paths
                    .iter()
                    .find(|p| notepath::in_folder(p, &self.secondary_folder))
            })
            .or_else(|| {
                paths
                    .iter()
                    .find(|p| !notepath::in_folder(p, &self.low_priority_folder))
            })
            .or_else(|| paths.first())
            .map(String::as_str)
    }

    /// Whether a linking name falls under the low-priority folder.
    ///
    /// Naive prefix check on the name itself — no path resolution.
    #[must_use]
    pub fn is_low_priority(&self, name: &str) -> bool {
        notepath::in_folder(name, &self.low_priority_folder)
    }
}
