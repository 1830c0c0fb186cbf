//! GitHub endpoint handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::github::parse_repository_list;

#[derive(Debug, Deserialize)]
pub struct RepositoriesQuery {
    /// Comma-separated `owner/name` identifiers
    pub repos: Option<String>,
}

/// GET /api/github-profile
pub async fn get_profile(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let handle = &state.settings.github_handle;
    debug!(handle = %handle, "Fetching GitHub profile");

    let profile = state.activity.profile(handle).await.map_err(|e| {
        ApiError::from_domain("github-profile", e, "Failed to fetch GitHub profile")
    })?;

    Ok((
        [(header::CACHE_CONTROL, state.settings.proxy_cache_control.clone())],
        Json(profile),
    ))
}

/// GET /api/github-repos?repos=owner/a,owner/b
pub async fn get_repositories(
    State(state): State<AppState>,
    Query(query): Query<RepositoriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let identifiers = parse_repository_list(query.repos.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::from_domain("github-repos", e, "Failed to fetch repositories"))?;
    debug!(count = identifiers.len(), "Fetching GitHub repositories");

    let repositories = state.activity.repositories(&identifiers).await.map_err(|e| {
        ApiError::from_domain("github-repos", e, "Failed to fetch repositories")
    })?;

    Ok((
        [(header::CACHE_CONTROL, state.settings.proxy_cache_control.clone())],
        Json(repositories),
    ))
}
