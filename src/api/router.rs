use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::admin;
use super::ask;
use super::health;
use super::metrics;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Question answering
        .route("/ask", post(ask::ask))
        // Metrics
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/metrics/json", get(metrics::json_metrics))
        // Admin API
        .nest("/admin", admin::create_admin_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
