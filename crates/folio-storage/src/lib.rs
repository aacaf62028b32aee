//! Storage abstraction for Folio documentation sites.
//!
//! This crate provides a [`Storage`] trait for abstracting content scanning and
//! retrieval from the underlying backend, so the content source can be tested
//! without touching the real filesystem.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()`, `read()`, `exists()` and `mtime()` methods
//! - [`FsStorage`] implementation for a content directory on disk
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//! - [`Meta`], the `meta.json` sidecar record, and its canonical writer
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("content/docs"));
//! for entry in storage.scan()? {
//!     println!("{} ({:?})", entry.path, entry.kind);
//! }
//! ```

mod fs;
pub mod meta;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
pub use meta::Meta;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};
