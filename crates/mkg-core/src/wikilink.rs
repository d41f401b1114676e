//! Wiki-link extraction.
//!
//! Recognizes the `[[Target]]` and `[[Target|display alias]]` reference
//! syntax. The alias is display-only and discarded; only the target name
//! is kept. Anything outside the recognized syntax is plain text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WIKI_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("wiki-link pattern is valid"));

/// The distinct set of link targets referenced by `text`.
///
/// Never fails: malformed or absent syntax yields an empty set.
#[must_use]
pub fn extract_links(text: &str) -> HashSet<String> {
    WIKI_LINK
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .map(|target| target.split('|').next().unwrap_or(target).trim())
        .filter(|target| !target.is_empty())
        .map(str::to_string)
        .collect()
}
