//! Search endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use folio_source::{DEFAULT_LIMIT, SearchResult};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters of GET /api/search.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    /// Search text.
    #[serde(default)]
    query: String,
    /// Locale code; the default locale when absent.
    locale: Option<String>,
    /// Maximum number of pages.
    limit: Option<usize>,
}

/// Handle GET /api/search.
pub(crate) async fn search(
    Query(params): Query<SearchParams>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SearchResult>> {
    let results = state.source.search(
        &params.query,
        params.locale.as_deref(),
        params.limit.unwrap_or(DEFAULT_LIMIT),
    );
    tracing::debug!(query = %params.query, results = results.len(), "Search");
    Json(results)
}
