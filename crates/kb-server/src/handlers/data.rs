//! Raw data documents.
//!
//! `GET /data/{*path}` serves JSON documents from the content root as-is.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /data/{*path}.
pub(crate) async fn get_data(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let body = state.storage.read(&path)?;
    Ok(([(header::CONTENT_TYPE, kb_assets::mime_for(&path))], body))
}
