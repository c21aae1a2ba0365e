//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Email atau password salah")]
    InvalidCredentials,

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    #[error("{0} tidak ditemukan")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Validation error with a single offending field
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        AppError::Validation {
            message: reason.to_string(),
            fields: vec![field.to_string()],
        }
    }

    /// Validation error listing every missing required field
    pub fn missing_fields(fields: Vec<String>) -> Self {
        AppError::Validation {
            message: "missing required fields".to_string(),
            fields,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 401 Unauthorized
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, "missing_token", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
            }

            // 403 Forbidden
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),

            // 400 Bad Request
            AppError::Validation { fields, .. } => {
                let details = if fields.is_empty() {
                    None
                } else {
                    Some(fields.join(", "))
                };
                (StatusCode::BAD_REQUEST, "validation_error", details)
            }
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", Some(msg.clone())),

            // 404 Not Found
            AppError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, "not_found", Some(entity.to_string()))
            }

            // 500 Internal Server Error - details stay in the server log
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let error = if status.is_server_error() {
            // Generic body for 5xx, the real cause was logged above
            "Terjadi kesalahan pada server".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
