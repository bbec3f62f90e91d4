//! postweek-web library
//!
//! HTTP surface for the week-state service: JSON data endpoint, admin
//! cache clear, health check, and the embedded front end.

use std::sync::Arc;

use axum::Router;
use postweek_common::DataService;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Data service owning the remote source and the cache
    pub service: Arc<DataService>,
    /// Shared secret for the clear-cache endpoint; `None` disables it
    pub api_key: Option<String>,
    /// `Cache-Control: max-age` advertised on the data endpoint
    pub cache_max_age_secs: u64,
}

impl AppState {
    pub fn new(service: Arc<DataService>, api_key: Option<String>, cache_max_age_secs: u64) -> Self {
        Self {
            service,
            api_key,
            cache_max_age_secs,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/api/data", get(api::get_data))
        .route("/api/clear-cache", get(api::clear_cache))
        .route("/health", get(api::health_check))
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
