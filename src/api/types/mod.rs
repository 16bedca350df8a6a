//! Request and response types for the HTTP API

pub mod ask;
pub mod error;
pub mod json;

pub use ask::{AskRequest, AskResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
