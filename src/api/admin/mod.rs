//! Admin API endpoints for inspecting and resetting the caches

pub mod semantic_cache;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new().route(
        "/semantic-cache",
        get(semantic_cache::get_semantic_cache).delete(semantic_cache::clear_semantic_cache),
    )
}
