//! JSON body extractor whose rejections use the API error body

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::{ApiError, ApiErrorType};

/// `axum::Json` with rejections rendered as `{"error": {...}}`
///
/// Status codes follow axum: malformed JSON is 400, a body of the wrong
/// shape is 422, a missing `Content-Type` is 415.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(rejection_to_api_error)
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    let (code, message) = match &rejection {
        JsonRejection::JsonSyntaxError(err) => {
            ("invalid_json", format!("Request body is not valid JSON: {}", err.body_text()))
        }
        JsonRejection::JsonDataError(err) => {
            // serde's message names the offending field
            ("invalid_body", format!("Request body has the wrong shape: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => (
            "unsupported_media_type",
            "Expected 'Content-Type: application/json'".to_string(),
        ),
        JsonRejection::BytesRejection(err) => {
            ("body_read_error", format!("Failed to read request body: {}", err.body_text()))
        }
        other => ("invalid_body", other.body_text()),
    };

    ApiError::new(rejection.status(), ApiErrorType::InvalidRequestError, message).with_code(code)
}
