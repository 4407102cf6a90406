//! Error types for featws-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Result type for featws-api setup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring and booting the API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing configuration value
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Core/service failure during startup
    #[error(transparent)]
    Core(#[from] featws_core::Error),

    /// Persistence failure during startup
    #[error(transparent)]
    Store(#[from] featws_store::Error),

    /// Socket binding or serving failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

/// Error shape returned by request handlers
///
/// Owns the mapping from service errors to status codes: 400 validation,
/// 404 not-found, 401 failed authentication, 504 deadline expiry, 500
/// for everything else.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String },
    NotFound,
    Unauthorized,
    Timeout,
    Internal(featws_core::Error),
}

impl From<featws_core::Error> for ApiError {
    fn from(e: featws_core::Error) -> Self {
        if e.is_bad_request() {
            ApiError::BadRequest {
                message: e.to_string(),
            }
        } else if e.is_not_found() {
            ApiError::NotFound
        } else {
            ApiError::Internal(e)
        }
    }
}

impl From<featws_store::Error> for ApiError {
    fn from(e: featws_store::Error) -> Self {
        ApiError::from(featws_core::Error::from(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            ApiError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "operation deadline exceeded".to_string(),
            ),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
