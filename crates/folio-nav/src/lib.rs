//! Navigation metadata generator.
//!
//! Walks the declarative `docs.json` navigation and writes `meta.json`
//! files that mirror it, so the content source orders pages and folders
//! the same way the navigation does.
//!
//! Page paths in the navigation are relative to the content root and start
//! with the locale (`en/use-dify/getting-started/introduction`). A group's
//! directory is the parent of its first page, found depth-first.
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! use folio_nav::{NavGenerator, NavOptions};
//!
//! let generator = NavGenerator::new(NavOptions {
//!     output_dir: PathBuf::from("content/docs"),
//!     ..NavOptions::default()
//! });
//! let report = generator.run(Path::new("docs.json")).unwrap();
//! println!("{} files written", report.written.len());
//! ```

mod document;
mod dropdown;
mod generator;

use std::path::PathBuf;

pub use document::{Dropdown, Group, Language, NavDocument, NavItem, Navigation, Version, first_page};
pub use dropdown::DropdownDirs;
pub use generator::{GenerateReport, NavGenerator, NavOptions};

/// Navigation generator error.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Navigation document could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Navigation document is not valid.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// Writing a `meta.json` file failed.
    #[error(transparent)]
    Write(#[from] folio_storage::StorageError),
}
