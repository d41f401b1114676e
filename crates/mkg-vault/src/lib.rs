//! # mkg-vault
//!
//! File system operations for the note vault.
//!
//! The vault is the authoritative source of truth: every note is a plain
//! markdown file under the vault root, addressed by its vault-relative
//! path without extension. The link-graph index is a derived, in-memory
//! view that can always be rebuilt from these files.

pub mod watcher;

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use tracing::debug;

use mkg_core::error::{MkgError, Result};
use mkg_core::{frontmatter, notepath};

/// Collection-level settings: which files count as notes and which
/// subdirectory is reserved for configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Note file extension, without the dot.
    pub extension: String,
    /// Reserved configuration subdirectory, never scanned or watched.
    pub config_dir: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            config_dir: ".mkg".to_string(),
        }
    }
}

/// A note loaded from disk, frontmatter split from body.
#[derive(Debug, Clone)]
pub struct Note {
    /// Vault-relative path without extension.
    pub path: String,
    /// Bare note name (last path segment).
    pub name: String,
    pub frontmatter: Option<Mapping>,
    pub body: String,
}

/// Handle to one vault directory.
pub struct Vault {
    root: PathBuf,
    config: VaultConfig,
}

impl Vault {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, VaultConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: VaultConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Filesystem path of a note.
    #[must_use]
    pub fn note_file(&self, path: &str) -> PathBuf {
        notepath::to_file_path(&self.root, path, &self.config.extension)
    }

    /// Raw text of a note.
    ///
    /// # Errors
    ///
    /// Returns [`MkgError::NoteNotFound`] when the file does not exist,
    /// [`MkgError::Io`] for any other read failure.
    pub fn read_note(&self, path: &str) -> Result<String> {
        match fs::read_to_string(self.note_file(path)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(MkgError::NoteNotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write note text, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`MkgError::Io`] if the write fails.
    pub fn write_note(&self, path: &str, text: &str) -> Result<()> {
        let file = self.note_file(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(file, text)?;
        Ok(())
    }

    /// Load a note and split its optional frontmatter block.
    ///
    /// # Errors
    ///
    /// Propagates read failures; returns [`MkgError::Frontmatter`] when a
    /// block is present but malformed.
    pub fn load_note(&self, path: &str) -> Result<Note> {
        let content = self.read_note(path)?;
        let front = frontmatter::parse(&content)?;
        let body = frontmatter::split(&content)
            .map(|(_, body)| body.to_string())
            .unwrap_or_else(|| content.clone());
        Ok(Note {
            path: path.to_string(),
            name: notepath::note_name(path).to_string(),
            frontmatter: front,
            body,
        })
    }

    /// Merge `updates` into a note's frontmatter and write it back.
    ///
    /// # Errors
    ///
    /// Propagates read, merge, and write failures.
    pub fn update_frontmatter(&self, path: &str, updates: &Mapping) -> Result<()> {
        let content = self.read_note(path)?;
        let merged = frontmatter::merge(&content, updates)?;
        self.write_note(path, &merged)
    }

    /// Enumerate every note path in the vault.
    ///
    /// Explicit stack-based walk; enumeration order is unspecified.
    /// Hidden directories and the reserved configuration directory are
    /// skipped, as are files without the note extension.
    ///
    /// # Errors
    ///
    /// Returns [`MkgError::Io`] if a directory cannot be read.
    pub fn note_paths(&self) -> Result<Vec<String>> {
        let mut stack = vec![self.root.clone()];
        let mut notes = Vec::new();
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let file_type = entry.file_type()?;
                if file_type.is_dir() {
                    if !self.is_excluded_dir(&entry.file_name()) {
                        stack.push(entry.path());
                    }
                } else if file_type.is_file() {
                    if let Some(path) =
                        notepath::to_note_path(&self.root, &entry.path(), &self.config.extension)
                    {
                        notes.push(path);
                    }
                }
            }
        }
        debug!("enumerated {} notes under {}", notes.len(), self.root.display());
        Ok(notes)
    }

    fn is_excluded_dir(&self, name: &OsStr) -> bool {
        name.to_str()
            .is_none_or(|s| s.starts_with('.') || s == self.config.config_dir)
    }
}
