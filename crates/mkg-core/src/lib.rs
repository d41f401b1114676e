//! # mkg-core
//!
//! Core types shared across all MKG crates:
//! - Error hierarchy ([`MkgError`], [`Result`])
//! - Wiki-link extraction ([`wikilink`])
//! - Note path/name helpers ([`notepath`])
//! - YAML frontmatter parsing and merging ([`frontmatter`])

pub mod error;
pub mod frontmatter;
pub mod notepath;
pub mod wikilink;

pub use error::{MkgError, Result};
pub use wikilink::extract_links;
