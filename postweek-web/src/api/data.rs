//! Week-state data endpoint

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::AppState;

/// GET /api/data
///
/// Returns the week-state payload as JSON, advertising a client-side
/// max-age so the front end does not hammer the service. A refresh
/// failure surfaces as a generic server error; the details only go to
/// the log.
pub async fn get_data(State(state): State<AppState>) -> Result<Response, DataError> {
    let payload = state.service.get_data().await.map_err(|e| {
        error!("data refresh failed: {}", e);
        DataError::RefreshFailed
    })?;

    let cache_control = format!("max-age={}", state.cache_max_age_secs);
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(payload)).into_response())
}

/// Data endpoint error types for HTTP responses
#[derive(Debug)]
pub enum DataError {
    RefreshFailed,
}

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DataError::RefreshFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to refresh publication data",
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
