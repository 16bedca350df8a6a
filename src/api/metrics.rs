//! Metrics endpoints

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use super::state::AppState;
use super::types::Json;
use crate::infrastructure::observability::MetricsSummary;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics in Prometheus text exposition format
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

/// GET /metrics/json
pub async fn json_metrics(State(state): State<AppState>) -> Json<MetricsSummary> {
    Json(state.metrics.summary())
}
