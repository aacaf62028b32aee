//! Page tree endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{OriginalUri, Path, State};
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/tree/{lang}.
pub(crate) async fn get_tree(
    Path(lang): Path<String>,
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ServerError> {
    let tree = state
        .source
        .page_tree(Some(&lang))
        .ok_or_else(|| ServerError::PageNotFound(uri.path().to_owned()))?;
    Ok(Json(&*tree).into_response())
}
