//! Question answering endpoint

use axum::extract::State;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use super::state::AppState;
use super::types::{ApiError, AskRequest, AskResponse, Json};

/// POST /ask
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("ask", request_id = %request_id);

    let answer = state
        .orchestrator
        .answer(&request.question)
        .instrument(span)
        .await
        .map_err(|e| {
            error!(request_id = %request_id, error = %e, "Failed to answer question");
            ApiError::from(e)
        })?;

    Ok(Json(AskResponse::from(answer)))
}
