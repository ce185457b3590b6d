//! Subject search API.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use kb_site::{compose_search_results, filter_subjects, search};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Response for GET /api/search.
#[derive(Debug, Serialize)]
pub(crate) struct SearchResponse {
    /// Ids of subjects whose name matches, for the sidebar filter.
    ids: Vec<String>,
    /// Home search result markup; `None` for queries too short to search.
    html: Option<String>,
}

/// Handle GET /api/search?q=.
pub(crate) async fn get_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ServerError> {
    let viewer = state.viewer()?;
    let metadata = viewer.session().metadata();

    let ids = filter_subjects(metadata, &params.q)
        .into_iter()
        .map(|s| s.id.clone())
        .collect();
    let html = search(metadata, &params.q).map(|results| compose_search_results(&results));

    Ok(Json(SearchResponse { ids, html }))
}
