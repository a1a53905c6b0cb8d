//! Filesystem walker yielding every regular file under a root

use crate::error::TreeError;
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// A regular file found during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Forward-slash path relative to the walk root (the leaf key)
    pub relative_path: String,
    /// Absolute path used to read the content
    pub path: PathBuf,
    pub size: u64,
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Whether to descend into symlinked directories (default: false).
    /// Symlinks to regular files are hashed either way.
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Path components to skip (e.g. ".git", "target"). Empty by default so
    /// every file is fingerprinted.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect every regular file
    ///
    /// Enumeration order is whatever the filesystem returns; the tree builder
    /// sorts leaves itself. Dangling symlinks and files whose path is not
    /// valid UTF-8 are skipped.
    pub fn walk(&self) -> Result<Vec<FileEntry>, TreeError> {
        if !self.root.is_dir() {
            return Err(TreeError::InvalidRoot(self.root.clone()));
        }

        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX));

        let root = self.root.clone();
        let iter = walker
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(&root, entry));

        for entry in iter {
            let entry = entry.map_err(|e| {
                let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                TreeError::io(at, source)
            })?;

            let file_type = entry.file_type();
            let metadata = if file_type.is_file() {
                entry
                    .metadata()
                    .map_err(|e| TreeError::io(entry.path(), std::io::Error::other(e.to_string())))?
            } else if file_type.is_symlink() {
                // A link to a regular file counts under the link's own path
                match std::fs::metadata(entry.path()) {
                    Ok(target) if target.is_file() => target,
                    Ok(_) => continue,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!(path = %entry.path().display(), "Skipping dangling symlink");
                        continue;
                    }
                    Err(e) => return Err(TreeError::io(entry.path(), e)),
                }
            } else {
                continue;
            };

            let relative_path = match path::relative_key(&self.root, entry.path()) {
                Ok(key) => key,
                Err(TreeError::NonUtf8Path(at)) => {
                    warn!(path = ?at, "Skipping file whose path is not valid UTF-8");
                    continue;
                }
                Err(e) => return Err(e),
            };
            trace!(path = %relative_path, size = metadata.len(), "Found file");

            entries.push(FileEntry {
                relative_path,
                path: entry.path().to_path_buf(),
                size: metadata.len(),
            });
        }

        debug!(file_count = entries.len(), root = %self.root.display(), "Walked filesystem");
        Ok(entries)
    }

    /// Check whether an entry below the root matches an ignore pattern
    fn should_ignore(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || self.config.ignore.is_empty() {
            return false;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        relative.components().any(|component| match component {
            std::path::Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.config.ignore.iter().any(|pattern| pattern == name.as_ref())
            }
            _ => false,
        })
    }
}
