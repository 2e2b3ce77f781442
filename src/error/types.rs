use thiserror::Error;
use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Server(_)
            | AppError::Logging(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details
        let body = match &self {
            AppError::Internal(_) | AppError::Logging(_) => "Internal error".to_string(),
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

/// Failures while installing the log subscriber. Sanitization itself never
/// fails; these only come from setup.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Unsupported log format: {0}. Use 'json' or 'pretty'")]
    UnsupportedFormat(String),

    #[error("A global log subscriber is already installed")]
    AlreadyInitialized,
}
