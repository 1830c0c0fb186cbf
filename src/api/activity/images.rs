//! Image metadata handler

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::ApiError;

#[derive(Debug, Deserialize)]
pub struct ImageMetadataQuery {
    /// Image location relative to the image root
    pub path: Option<String>,
}

/// GET /api/image-metadata?path=photos/a.jpg
pub async fn get_image_metadata(
    State(state): State<AppState>,
    Query(query): Query<ImageMetadataQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = state
        .activity
        .image_metadata(query.path.as_deref().unwrap_or_default())
        .await
        .map_err(|e| {
            ApiError::from_domain("image-metadata", e, "Failed to extract image metadata")
        })?;

    Ok((
        [(header::CACHE_CONTROL, state.settings.metadata_cache_control.clone())],
        Json(metadata),
    ))
}
