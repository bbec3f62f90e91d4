//! Administrative cache-clear endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::AppState;

/// Query parameters for the clear-cache endpoint
#[derive(Debug, Deserialize)]
pub struct ClearCacheQuery {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// GET /api/clear-cache?apiKey=SECRET
///
/// Key mismatch, missing key, and no configured key all answer with a
/// plain 404, indistinguishable from an unknown route, so the endpoint
/// never confirms its own existence. On match the cache slot is emptied
/// and the next data read fetches fresh.
pub async fn clear_cache(
    State(state): State<AppState>,
    Query(query): Query<ClearCacheQuery>,
) -> Response {
    let authorized = match (&state.api_key, &query.api_key) {
        (Some(expected), Some(provided)) => expected == provided,
        _ => false,
    };

    if !authorized {
        warn!("rejected clear-cache request");
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    state.service.clear_cache().await;
    info!("cache cleared via admin endpoint");
    (StatusCode::OK, "OK").into_response()
}
