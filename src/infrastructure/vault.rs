//! File system access to a vault of markdown notes

use crate::error::{Result, TagError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Abstract repository for note reads and writes
pub trait NoteRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Read a note as UTF-8 text
    fn read_note(&self, path: &Path) -> Result<String>;

    /// Overwrite a note with new content
    fn write_note(&self, path: &Path, content: &str) -> Result<()>;
}

/// A directory tree of markdown notes rooted at an absolute path
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Open a vault, checking that the root is an absolute, traversal-free directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if root.as_os_str().is_empty() {
            return Err(TagError::invalid_path(root, "path cannot be empty"));
        }
        if !root.is_absolute() {
            return Err(TagError::invalid_path(root, "path must be absolute"));
        }
        if has_parent_segment(&root) {
            return Err(TagError::invalid_path(root, "path contains directory traversal"));
        }
        if !root.is_dir() {
            return Err(TagError::invalid_path(root, "not an existing directory"));
        }

        Ok(Vault { root })
    }

    /// Join a root-relative path onto the root, rejecting absolute and `..` paths.
    pub fn resolve(&self, relative: &Path) -> Result<PathBuf> {
        if relative.as_os_str().is_empty() {
            return Err(TagError::invalid_path(relative, "path cannot be empty"));
        }
        if relative.is_absolute() || relative.has_root() || has_parent_segment(relative) {
            return Err(TagError::invalid_path(
                relative,
                "path must be relative to root and cannot contain '..'",
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl NoteRepository for Vault {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read_note(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(TagError::Io)
    }

    /// Whole-file overwrite, no temp file and no locking. Concurrent external edits
    /// between read and write are lost.
    fn write_note(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(TagError::Io)
    }
}

fn has_parent_segment(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}
