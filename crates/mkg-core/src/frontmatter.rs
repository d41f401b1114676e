//! Optional YAML frontmatter parsing and merging.
//!
//! Handles the `---` delimited YAML block at the top of a note:
//! ```markdown
//! ---
//! tags: [rust, graphs]
//! ---
//!
//! Body content here, possibly with [[links]].
//! ```
//!
//! Unlike structured document stores, notes here are free-form: a missing
//! frontmatter block is `None`, never an error.

use serde_yaml::{Mapping, Value};

use crate::error::{MkgError, Result};

/// Split a note into `(yaml, body)` when it opens with a frontmatter
/// block, or `None` when it does not.
#[must_use]
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let close = rest.find("\n---")?;
    let yaml = &rest[..close];

    let body = &rest[close + 4..];
    let body = body.strip_prefix('\r').unwrap_or(body);
    let body = body.strip_prefix('\n').unwrap_or(body);
    Some((yaml, body))
}

/// Parse a note's frontmatter into a YAML mapping.
///
/// # Errors
///
/// Returns [`MkgError::Frontmatter`] when a block is present but is not
/// valid YAML or not a mapping.
pub fn parse(content: &str) -> Result<Option<Mapping>> {
    let Some((yaml, _)) = split(content) else {
        return Ok(None);
    };
    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| MkgError::Frontmatter(e.to_string()))?;
    match value {
        Value::Mapping(map) => Ok(Some(map)),
        Value::Null => Ok(Some(Mapping::new())),
        _ => Err(MkgError::Frontmatter(
            "frontmatter must be a YAML mapping".to_string(),
        )),
    }
}

/// Upsert `updates` into the note's frontmatter, creating the block when
/// absent. The body is preserved byte for byte.
///
/// # Errors
///
/// Returns [`MkgError::Frontmatter`] when the existing block is malformed
/// or the merged mapping cannot be serialized.
pub fn merge(content: &str, updates: &Mapping) -> Result<String> {
    let (mut map, body) = match split(content) {
        Some((_, body)) => {
            let existing = parse(content)?.unwrap_or_default();
            (existing, body)
        }
        None => (Mapping::new(), content),
    };

    for (key, value) in updates {
        map.insert(key.clone(), value.clone());
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(map))
        .map_err(|e| MkgError::Frontmatter(e.to_string()))?;

    let mut output = String::with_capacity(yaml.len() + body.len() + 8);
    output.push_str("---\n");
    output.push_str(&yaml);
    output.push_str("---\n");
    output.push_str(body);
    Ok(output)
}
