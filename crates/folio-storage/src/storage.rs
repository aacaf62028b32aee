//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for abstracting content scanning and retrieval,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Path Convention
//!
//! All path parameters are relative to the content root and use `/` as the
//! separator regardless of platform:
//! - `"en/index.mdx"` - locale landing page
//! - `"zh/use-dify/getting-started/introduction.mdx"` - nested page
//! - `"ja/meta.json"` - directory metadata

use std::path::PathBuf;

/// Kind of a scanned content entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Markdown or MDX page (`.md`, `.mdx`).
    Page,
    /// Directory metadata sidecar (`meta.json` or `meta.<locale>.json`).
    Meta,
}

impl EntryKind {
    /// Classify a relative path, returning `None` for files that are not content.
    #[must_use]
    pub fn classify(path: &str) -> Option<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        if name.starts_with('.') {
            return None;
        }
        if name == "meta.json"
            || name
                .strip_prefix("meta.")
                .and_then(|rest| rest.strip_suffix(".json"))
                .is_some_and(|locale| !locale.is_empty() && !locale.contains('.'))
        {
            return Some(Self::Meta);
        }
        let is_page = name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && matches!(ext, "md" | "mdx"));
        is_page.then_some(Self::Page)
    }
}

/// Content entry returned by storage scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the content root (e.g., "en/guide/setup.mdx").
    pub path: String,
    /// Entry kind.
    pub kind: EntryKind,
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Content could not be encoded or decoded.
    Encoding,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::Encoding,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Encoding => "Encoding error",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for content scanning and retrieval.
///
/// Implementations must be cheap to share across request handlers; all
/// methods take `&self`.
pub trait Storage: Send + Sync {
    /// Scan and return all pages and metadata files, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if scanning fails.
    fn scan(&self) -> Result<Vec<Entry>, StorageError>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Check if a file exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Get modification time as seconds since Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or mtime can't be retrieved.
    fn mtime(&self, path: &str) -> Result<f64, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_pages() {
        assert_eq!(EntryKind::classify("en/guide.mdx"), Some(EntryKind::Page));
        assert_eq!(EntryKind::classify("en/guide.md"), Some(EntryKind::Page));
        assert_eq!(EntryKind::classify("guide.zh.mdx"), Some(EntryKind::Page));
    }

    #[test]
    fn test_classify_meta() {
        assert_eq!(EntryKind::classify("en/meta.json"), Some(EntryKind::Meta));
        assert_eq!(EntryKind::classify("guide/meta.zh.json"), Some(EntryKind::Meta));
        assert_eq!(EntryKind::classify("meta.json"), Some(EntryKind::Meta));
    }

    #[test]
    fn test_classify_ignored() {
        assert_eq!(EntryKind::classify("en/.draft.mdx"), None);
        assert_eq!(EntryKind::classify("en/logo.png"), None);
        assert_eq!(EntryKind::classify("en/openapi.json"), None);
        assert_eq!(EntryKind::classify("en/.mdx"), None);
        assert_eq!(EntryKind::classify("meta..json"), None);
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("en/missing.mdx").with_backend("Mock");
        assert_eq!(err.to_string(), "[Mock] Not found (path: en/missing.mdx)");
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::io(io, Some(PathBuf::from("/docs/a.mdx")));
        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Permission denied: denied (path: /docs/a.mdx)");
    }
}
