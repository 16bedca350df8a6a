//! Semantic cache admin endpoints

use axum::extract::State;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Serialize)]
pub struct SemanticCacheStatusResponse {
    pub size: usize,
    pub enabled: bool,
    pub dimension: usize,
    pub similarity_threshold: f32,
    pub embedding_model: String,
}

#[derive(Debug, Serialize)]
pub struct SemanticCacheClearedResponse {
    pub deleted: usize,
}

/// GET /admin/semantic-cache
pub async fn get_semantic_cache(
    State(state): State<AppState>,
) -> Result<Json<SemanticCacheStatusResponse>, ApiError> {
    let size = state.semantic_cache.size().await.map_err(ApiError::from)?;
    let config = state.semantic_cache.config();

    Ok(Json(SemanticCacheStatusResponse {
        size,
        enabled: config.enabled,
        dimension: config.dimension,
        similarity_threshold: config.threshold(),
        embedding_model: config.embedding_model.clone(),
    }))
}

/// DELETE /admin/semantic-cache
pub async fn clear_semantic_cache(
    State(state): State<AppState>,
) -> Result<Json<SemanticCacheClearedResponse>, ApiError> {
    let deleted = state.semantic_cache.clear().await.map_err(ApiError::from)?;

    info!(deleted = deleted, "Semantic cache cleared");

    Ok(Json(SemanticCacheClearedResponse { deleted }))
}
