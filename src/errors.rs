use crate::translate::TranslateError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

/// Errors surfaced by the handlers. Rendered as `{"detail": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Translation(#[from] TranslateError),
    #[error("Only .txt files are supported.")]
    UnsupportedFileType,
    #[error("{0}")]
    InvalidUpload(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Translation(_) | ApiError::UnsupportedFileType => StatusCode::BAD_REQUEST,
            ApiError::InvalidUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Rejecting request with {}: {}", status, self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
