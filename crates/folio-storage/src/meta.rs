//! Directory metadata (`meta.json`) record.
//!
//! The same record is read by the content source and written by the
//! navigation and API reference generators. Written files use 2-space
//! indentation, a trailing newline, and keep non-ASCII text literal, so
//! repeated runs over unchanged input are byte-identical.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::storage::{StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Meta";

/// Directory metadata.
///
/// Field order is the serialization order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Folder title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Folder description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Marks the folder as a navigation root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,
    /// Folder starts expanded in the sidebar.
    #[serde(
        default,
        rename = "defaultOpen",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_open: Option<bool>,
    /// Ordered item references (see the content source for the syntax).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<String>>,
}

impl Meta {
    /// Metadata listing `pages` under `title`.
    #[must_use]
    pub fn listing(title: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            title: Some(title.into()),
            pages: Some(pages),
            ..Self::default()
        }
    }

    /// Metadata marking a navigation root.
    #[must_use]
    pub fn root_marker() -> Self {
        Self {
            root: Some(true),
            ..Self::default()
        }
    }

    /// Parse metadata from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with [`StorageErrorKind::Encoding`] on malformed JSON.
    pub fn from_json(text: &str) -> Result<Self, StorageError> {
        serde_json::from_str(text).map_err(|e| {
            StorageError::new(StorageErrorKind::Encoding)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }

    /// Canonical JSON text: pretty-printed with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if serialization fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        let mut text = serde_json::to_string_pretty(self).map_err(|e| {
            StorageError::new(StorageErrorKind::Encoding)
                .with_backend(BACKEND)
                .with_source(e)
        })?;
        text.push('\n');
        Ok(text)
    }

    /// Write canonical JSON to `path`, replacing any existing file.
    ///
    /// The parent directory must exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if serialization or the write fails.
    pub fn write(&self, path: &Path) -> Result<(), StorageError> {
        let text = self.to_json()?;
        std::fs::write(path, text).map_err(|e| {
            StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND)
        })?;
        tracing::debug!(path = %path.display(), "Wrote meta.json");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_listing_json() {
        let meta = Meta::listing(
            "Getting Started",
            vec!["introduction".to_owned(), "setup".to_owned()],
        );
        assert_eq!(
            meta.to_json().unwrap(),
            "{\n  \"title\": \"Getting Started\",\n  \"pages\": [\n    \"introduction\",\n    \"setup\"\n  ]\n}\n"
        );
    }

    #[test]
    fn test_root_marker_json() {
        assert_eq!(
            Meta::root_marker().to_json().unwrap(),
            "{\n  \"root\": true\n}\n"
        );
    }

    #[test]
    fn test_non_ascii_is_literal() {
        let meta = Meta::listing("文档", vec!["use-dify".to_owned()]);
        let json = meta.to_json().unwrap();
        assert!(json.contains("\"文档\""));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_parse_default_open() {
        let meta = Meta::from_json(r#"{"title":"Guide","defaultOpen":true,"pages":["a"]}"#).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Guide"));
        assert_eq!(meta.default_open, Some(true));
        assert_eq!(meta.pages, Some(vec!["a".to_owned()]));
        assert_eq!(meta.root, None);
    }

    #[test]
    fn test_parse_malformed() {
        let err = Meta::from_json("{ not json").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::Encoding);
    }

    #[test]
    fn test_write_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        let meta = Meta::listing("API 参考", vec!["chat".to_owned()]);

        meta.write(&path).unwrap();
        let first = std::fs::read(&path).unwrap();
        meta.write(&path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(Meta::from_json(&String::from_utf8(first).unwrap()).unwrap(), meta);
    }
}
