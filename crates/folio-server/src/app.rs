//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::OriginalUri;
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/search", get(handlers::search::search))
        .route("/api/tree/{lang}", get(handlers::tree::get_tree));

    Router::new()
        .merge(api_routes)
        .route("/", get(handlers::pages::get_root))
        .route("/llms.mdx/{*path}", get(handlers::markdown::get_llms_text))
        .route("/{lang}", get(handlers::pages::get_locale))
        .route("/{lang}/{*slug}", get(handlers::pages::get_page))
        .fallback(not_found)
        .layer(security::layers())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    ServerError::PageNotFound(uri.path().to_owned())
}
