//! View and event API.
//!
//! `GET /api/view` returns the current [`View`]; `POST /api/events` applies
//! one navigator event and returns the resulting view.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kb_site::{Event, View};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/view.
pub(crate) async fn get_view(State(state): State<Arc<AppState>>) -> Result<Json<View>, ServerError> {
    let viewer = state.viewer()?;
    Ok(Json(viewer.view().clone()))
}

/// Handle POST /api/events.
pub(crate) async fn post_event(
    State(state): State<Arc<AppState>>,
    event: Result<Json<Event>, JsonRejection>,
) -> Result<Json<View>, ServerError> {
    let Json(event) = event.map_err(|e| ServerError::BadEvent(e.body_text()))?;
    tracing::debug!(?event, "Handling event");
    let mut viewer = state.viewer()?;
    Ok(Json(viewer.handle(event).clone()))
}
