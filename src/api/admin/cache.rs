//! Cache management handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;

#[derive(Debug, Deserialize)]
pub struct InvalidateQuery {
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidateResponse {
    pub tag: String,
    pub removed: usize,
}

/// POST /admin/cache/invalidate?tag=github
pub async fn invalidate_cache_tag(
    State(state): State<AppState>,
    Query(query): Query<InvalidateQuery>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let tag = query
        .tag
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing tag parameter"))?;

    let removed = state.activity.invalidate_tag(&tag).await;
    info!(tag = %tag, removed, "Cache invalidated through admin API");

    Ok(Json(InvalidateResponse { tag, removed }))
}
