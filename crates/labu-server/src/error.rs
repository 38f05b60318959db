//! Maps [`labu_core::CoreError`] and request-parsing failures onto the
//! control-plane error taxonomy: `{"error": "<message>"}` with a status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use labu_core::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RuntimeError(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::UnknownClient(msg) => ApiError::BadRequest(format!("unknown client: {msg}")),
            CoreError::Runtime(e) => ApiError::RuntimeError(e.to_string()),
            CoreError::Config(e) => ApiError::RuntimeError(e.to_string()),
            CoreError::Io(e) => ApiError::RuntimeError(e.to_string()),
            CoreError::Json(e) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RuntimeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::warn!(error = %self, "control-plane request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
