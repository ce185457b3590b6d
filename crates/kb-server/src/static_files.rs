//! Shell asset serving from `kb-assets`.

use axum::body::Body;
use axum::extract::Path;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;

/// Handle GET /assets/{*path}.
pub(crate) async fn get_asset(Path(path): Path<String>) -> Result<Response, ServerError> {
    let content = kb_assets::get(&path).ok_or_else(|| ServerError::NotFound(path.clone()))?;
    Ok((
        [(header::CONTENT_TYPE, kb_assets::mime_for(&path))],
        Body::from(content.into_owned()),
    )
        .into_response())
}
