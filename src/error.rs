use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Relay error: {0}")]
    RelayError(#[from] RelayError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// Add conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Implement actix_web::ResponseError for AppError
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();
        let response = json!({
            "error": {
                "status": status.as_u16(),
                "message": message
            }
        });
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::StoreError(StoreError::AlreadyExists { .. }) => StatusCode::BAD_REQUEST,
            AppError::StoreError(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors produced by the blueprint store.
///
/// Deletion has no error case: removing a missing record is defined as
/// success, so `delete` is infallible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Blueprint {author}/{name} already exists")]
    AlreadyExists { author: String, name: String },

    #[error("Blueprint {author}/{name} not found")]
    NotFound { author: String, name: String },
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid event format: {0}")]
    InvalidFormat(String),

    #[error("Message sending failed: {0}")]
    SendError(String),
}
