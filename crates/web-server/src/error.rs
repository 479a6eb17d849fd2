use aggregator::AggregatorError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// No line of the request body parsed as an event. Carries the raw body.
    #[error("The event was invalid.")]
    InvalidEvent(String),
    #[error("Aggregator error: {0}")]
    Aggregator(#[from] AggregatorError),
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidEvent(raw) => {
                tracing::debug!(body = %raw, "Rejected request with no valid events.");
                (StatusCode::BAD_REQUEST, "The event was invalid.".to_string())
            }
            AppError::Aggregator(AggregatorError::EmptyWindow) => (
                StatusCode::NOT_FOUND,
                AggregatorError::EmptyWindow.to_string(),
            ),
            AppError::Internal(message) => {
                tracing::error!(error = %message, "Unexpected failure while handling a request.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
