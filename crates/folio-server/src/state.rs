//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use folio_config::SiteConfig;
use folio_source::Source;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Content source (page index, trees, renders, search).
    pub(crate) source: Arc<Source>,
    /// Site presentation settings.
    pub(crate) site: SiteConfig,
    /// Application version, mixed into `ETag`s.
    pub(crate) version: String,
}
