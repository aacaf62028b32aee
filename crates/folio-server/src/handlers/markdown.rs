//! Markdown export endpoints.
//!
//! `/llms.mdx/<lang>/<slug…>` and `<page url>.mdx` return the page title
//! and processed markdown as `text/markdown`.

use std::sync::Arc;

use axum::extract::{OriginalUri, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::handlers::split_slugs;
use crate::state::AppState;

/// Handle GET /llms.mdx/{*path}.
pub(crate) async fn get_llms_text(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ServerError> {
    let mut segments = split_slugs(&path);
    if segments.is_empty() {
        return Err(ServerError::PageNotFound(uri.path().to_owned()));
    }
    let lang = segments.remove(0);
    markdown_response(&state, lang, &segments, uri.path())
}

/// Markdown of the page at `lang` / `slugs`.
pub(crate) fn markdown_response(
    state: &AppState,
    lang: &str,
    slugs: &[&str],
    request_path: &str,
) -> Result<Response, ServerError> {
    let page = state
        .source
        .get_page(slugs, Some(lang))
        .ok_or_else(|| ServerError::PageNotFound(request_path.to_owned()))?;
    let text = state.source.llm_text(&page)?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        text,
    )
        .into_response())
}
