//! Error types for MKG.

use thiserror::Error;

/// Top-level result type for MKG operations.
pub type Result<T> = std::result::Result<T, MkgError>;

/// Top-level error type for MKG.
#[derive(Debug, Error)]
pub enum MkgError {
    /// The note file does not exist (or vanished between event and read).
    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("vault error: {0}")]
    Vault(String),

    #[error("watch error: {0}")]
    Watch(String),

    #[error("frontmatter error: {0}")]
    Frontmatter(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
