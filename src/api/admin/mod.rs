//! Operator endpoints, mounted only when enabled in configuration

pub mod cache;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new().route("/cache/invalidate", post(cache::invalidate_cache_tag))
}
