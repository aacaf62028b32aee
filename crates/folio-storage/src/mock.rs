//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::storage::{Entry, EntryKind, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

#[derive(Debug)]
struct MockFile {
    content: String,
    mtime: f64,
}

/// Mock storage for testing.
///
/// Stores files in memory. Use the builder methods to configure the mock
/// with test data.
///
/// # Example
///
/// ```ignore
/// use folio_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("en/guide.mdx", "---\ntitle: Guide\n---\n\nContent.");
///
/// let entries = storage.scan().unwrap();
/// let content = storage.read("en/guide.mdx").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, MockFile>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content and an mtime of `0.0`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.set_file(path, content, 0.0);
        self
    }

    /// Set modification time for an existing file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: &str, mtime: f64) -> Self {
        if let Some(file) = self.files.write().unwrap().get_mut(path) {
            file.mtime = mtime;
        }
        self
    }

    /// Insert or replace a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<String>, content: impl Into<String>, mtime: f64) {
        self.files.write().unwrap().insert(
            path.into(),
            MockFile {
                content: content.into(),
                mtime,
            },
        );
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Entry>, StorageError> {
        let files = self.files.read().unwrap();
        Ok(files
            .keys()
            .filter_map(|path| {
                EntryKind::classify(path).map(|kind| Entry {
                    path: path.clone(),
                    kind,
                })
            })
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|file| file.content.clone())
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|file| file.mtime)
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageErrorKind;

    #[test]
    fn test_scan_sorted_and_classified() {
        let storage = MockStorage::new()
            .with_file("zh/b.mdx", "")
            .with_file("en/meta.json", "{}")
            .with_file("en/a.md", "")
            .with_file("en/logo.svg", "");

        let entries = storage.scan().unwrap();

        assert_eq!(
            entries,
            vec![
                Entry {
                    path: "en/a.md".to_owned(),
                    kind: EntryKind::Page
                },
                Entry {
                    path: "en/meta.json".to_owned(),
                    kind: EntryKind::Meta
                },
                Entry {
                    path: "zh/b.mdx".to_owned(),
                    kind: EntryKind::Page
                },
            ]
        );
    }

    #[test]
    fn test_read_and_mtime() {
        let storage = MockStorage::new()
            .with_file("en/a.mdx", "hello")
            .with_mtime("en/a.mdx", 42.0);

        assert_eq!(storage.read("en/a.mdx").unwrap(), "hello");
        assert!((storage.mtime("en/a.mdx").unwrap() - 42.0).abs() < f64::EPSILON);
        assert!(storage.exists("en/a.mdx"));
    }

    #[test]
    fn test_missing_file() {
        let storage = MockStorage::new();
        let err = storage.read("en/none.mdx").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert!(!storage.exists("en/none.mdx"));
    }

    #[test]
    fn test_set_file_replaces_content() {
        let storage = MockStorage::new().with_file("en/a.mdx", "old");
        storage.set_file("en/a.mdx", "new", 5.0);
        assert_eq!(storage.read("en/a.mdx").unwrap(), "new");
    }
}
