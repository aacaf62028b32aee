//! API reference generator.
//!
//! Turns one `OpenAPI` document per (locale, API name) pair into a directory
//! of MDX pages, one per operation, and marks each locale's
//! `api-reference/` directory as a navigation root with
//! `{ "root": true }`.
//!
//! Pages carry YAML frontmatter (`title`, `description`, `full`,
//! `_openapi`), the operation description, an `<APIPage />` tag and
//! `ParamField` / `ResponseField` listings. Local `$ref` pointers are
//! resolved.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use folio_openapi::{OpenApiGenerator, OpenApiOptions};
//!
//! # async fn run() {
//! let generator = OpenApiGenerator::new(OpenApiOptions {
//!     input_dir: PathBuf::from("api-reference"),
//!     output_dir: PathBuf::from("content/docs"),
//!     locales: vec!["en".to_owned()],
//!     apis: vec!["chat".to_owned()],
//!     include_description: true,
//! });
//! let summary = generator.run().await;
//! assert!(summary.is_success());
//! # }
//! ```

mod document;
mod generator;
mod page;

use std::path::PathBuf;

pub use document::{ApiDocument, Operation};
pub use generator::{GenerateSummary, OpenApiGenerator, OpenApiOptions, PairOutcome};

/// API reference generation error.
#[derive(Debug, thiserror::Error)]
pub enum OpenApiError {
    /// Input document could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Input document is not valid JSON.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// Page frontmatter could not be serialized.
    #[error("Frontmatter serialization error: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
    /// Writing a page or directory failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Writing the root marker failed.
    #[error(transparent)]
    Meta(#[from] folio_storage::StorageError),
    /// The generation task panicked.
    #[error("Generation task failed: {0}")]
    Task(String),
}
