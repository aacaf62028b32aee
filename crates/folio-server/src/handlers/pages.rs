//! Page endpoints.
//!
//! Serves rendered HTML documents with conditional request support, and
//! redirects `/` and `/<lang>` to the landing page.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::handlers::markdown::markdown_response;
use crate::handlers::split_slugs;
use crate::html::page_html;
use crate::state::AppState;

/// Suffix that turns a page URL into its markdown export.
const MARKDOWN_SUFFIX: &str = ".mdx";

/// Handle GET /.
pub(crate) async fn get_root(State(state): State<Arc<AppState>>) -> Redirect {
    landing_redirect(&state, &state.source.i18n().default_language)
}

/// Handle GET /{lang}.
pub(crate) async fn get_locale(
    Path(lang): Path<String>,
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ServerError> {
    if let Some(lang) = lang.strip_suffix(MARKDOWN_SUFFIX) {
        return markdown_response(&state, lang, &[], uri.path());
    }
    if !state.source.i18n().is_supported(&lang) {
        return Err(ServerError::PageNotFound(uri.path().to_owned()));
    }
    Ok(landing_redirect(&state, &lang).into_response())
}

/// Handle GET /{lang}/{*slug}.
pub(crate) async fn get_page(
    Path((lang, slug)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    if let Some(slug) = slug.strip_suffix(MARKDOWN_SUFFIX) {
        return markdown_response(&state, &lang, &split_slugs(slug), uri.path());
    }

    let page = state
        .source
        .get_page(&split_slugs(&slug), Some(&lang))
        .ok_or_else(|| ServerError::PageNotFound(uri.path().to_owned()))?;
    let html = page_html(&state.source, &state.site, &page)?;

    let etag = compute_etag(&state.version, &html);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let mtime = state.source.modified(&page)?;
    let last_modified: DateTime<Utc> = (UNIX_EPOCH + Duration::from_secs_f64(mtime.max(0.0))).into();

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
            (header::ETAG, etag),
            (
                header::LAST_MODIFIED,
                last_modified
                    .format("%a, %d %b %Y %H:%M:%S GMT")
                    .to_string(),
            ),
            (header::CACHE_CONTROL, "public, max-age=60".to_owned()),
        ],
        html,
    )
        .into_response())
}

fn landing_redirect(state: &AppState, lang: &str) -> Redirect {
    let landing = state.site.landing_page.trim_matches('/');
    Redirect::temporary(&format!("/{lang}/{landing}"))
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
