use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shorten_core::ShortenError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request payload: {0}")]
    InvalidPayload(JsonRejection),
    #[error(transparent)]
    Shorten(#[from] ShortenError),
}

impl AppError {
    /// Status code and plain-text body sent to the client.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::InvalidPayload(_) => {
                (StatusCode::BAD_REQUEST, "invalid request payload".to_string())
            }
            AppError::Shorten(ShortenError::EmptyLongUrl) => (
                StatusCode::BAD_REQUEST,
                "missing field: long_url cannot be empty".to_string(),
            ),
            AppError::Shorten(ShortenError::InvalidUrlFormat(_)) => {
                (StatusCode::BAD_REQUEST, "invalid URL format".to_string())
            }
            AppError::Shorten(
                err @ (ShortenError::EmptyKey | ShortenError::InvalidKeySize { .. }),
            ) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Shorten(ShortenError::KeyNotFound(_)) => {
                (StatusCode::NOT_FOUND, "short URL not found".to_string())
            }
            AppError::Shorten(ShortenError::Cache(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, message).into_response()
    }
}
