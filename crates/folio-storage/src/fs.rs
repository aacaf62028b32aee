//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading pages and metadata from a content
//! directory on the local filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Scans the content directory recursively for `.md`/`.mdx` pages and
/// `meta.json` files. Hidden files and directories are skipped.
pub struct FsStorage {
    /// Root directory for content.
    source_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Validate that a path doesn't escape the source directory.
    ///
    /// Rejects paths containing parent directory components (`..`) or
    /// absolute paths.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(path);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                std::path::Component::ParentDir
                    | std::path::Component::RootDir
                    | std::path::Component::Prefix(_)
            )
        });

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(rel)
                .with_backend(BACKEND));
        }
        Ok(self.source_dir.join(rel))
    }

    /// Scan directory recursively and collect entries.
    fn scan_directory(
        dir_path: &Path,
        prefix: &str,
        entries: &mut Vec<Entry>,
    ) -> Result<(), StorageError> {
        let read_dir = fs::read_dir(dir_path)
            .map_err(|e| StorageError::io(e, Some(dir_path.to_path_buf())).with_backend(BACKEND))?;

        let mut children: Vec<_> = read_dir
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                (e.file_name().to_string_lossy().into_owned(), is_dir)
            })
            .filter(|(name, _)| !name.starts_with('.'))
            .collect();
        children.sort();

        for (name, is_dir) in children {
            let rel_path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };

            if is_dir {
                if name == "node_modules" {
                    continue;
                }
                Self::scan_directory(&dir_path.join(&name), &rel_path, entries)?;
            } else if let Some(kind) = EntryKind::classify(&rel_path) {
                entries.push(Entry {
                    path: rel_path,
                    kind,
                });
            }
        }

        Ok(())
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Entry>, StorageError> {
        if !self.source_dir.exists() {
            tracing::warn!(dir = %self.source_dir.display(), "Content directory does not exist");
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        Self::scan_directory(&self.source_dir, "", &mut entries)?;
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(count = entries.len(), "Scanned content directory");
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let full_path = self.resolve(path)?;
        let metadata = fs::metadata(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))?;
        let modified = metadata
            .modified()
            .map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }
}
