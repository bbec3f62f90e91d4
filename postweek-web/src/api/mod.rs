//! HTTP API handlers for postweek-web

pub mod clear_cache;
pub mod data;
pub mod health;
pub mod ui;

pub use clear_cache::clear_cache;
pub use data::get_data;
pub use health::health_check;
pub use ui::{serve_app_js, serve_index};
