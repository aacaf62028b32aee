//! Content source for Folio documentation sites.
//!
//! Indexes MDX pages and `meta.json` files from a [`folio_storage::Storage`]
//! backend and answers the questions the site asks: which page lives at
//! `/<locale>/<slug…>`, what the sidebar tree of a locale looks like, what a
//! page renders to, and which pages match a search query.
//!
//! Locales come from the first path segment (`en/guide/setup.mdx`) or, with
//! the `dot` parser, from a file name suffix (`guide/setup.zh.mdx`). Folders
//! named `(group)` organize files without adding a URL segment, and `index`
//! pages take their folder's URL.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use folio_source::{Source, SourceConfig};
//! use folio_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("content/docs")));
//! let source = Source::new(storage, SourceConfig::default());
//!
//! if let Some(page) = source.get_page(&["guide", "setup"], Some("en")) {
//!     let rendered = source.render(&page)?;
//!     println!("{}", rendered.html);
//! }
//! ```

mod cache;
mod page;
mod path;
mod search;
mod source;
mod tree;

pub use page::{Page, PageImage, PageParams};
pub use search::{DEFAULT_LIMIT, DocKind, SearchIndex, SearchResult, Tokenizer};
pub use source::{Source, SourceConfig, SourceError};
pub use tree::{PageTree, TreeFolder, TreeNode, TreePage};
