//! Public activity endpoints

pub mod coding_stats;
pub mod github;
pub mod images;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create the `/api` router
pub fn create_activity_router() -> Router<AppState> {
    Router::new()
        .route("/github-profile", get(github::get_profile))
        .route("/github-repos", get(github::get_repositories))
        .route("/coding-stats", get(coding_stats::get_coding_stats))
        .route("/image-metadata", get(images::get_image_metadata))
}
