//! Coding statistics handler

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::StatsRange;

#[derive(Debug, Deserialize)]
pub struct CodingStatsQuery {
    pub range: Option<String>,
}

/// GET /api/coding-stats?range=last_7_days
///
/// Unknown ranges fall back to the default range.
pub async fn get_coding_stats(
    State(state): State<AppState>,
    Query(query): Query<CodingStatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = StatsRange::parse_or_default(query.range.as_deref());

    let stats = state
        .activity
        .coding_stats(&state.settings.coding_stats_username, range)
        .await
        .map_err(|e| ApiError::from_domain("coding-stats", e, "Failed to fetch coding stats"))?;

    Ok((
        [(header::CACHE_CONTROL, state.settings.proxy_cache_control.clone())],
        Json(stats),
    ))
}
