//! Error types for the tenant gate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::sanitize::SanitizeError;

/// Result type for gate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for gate operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request carried no tenant identity
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The tenant may not act on the referenced resource
    #[error("authorization failed: {0}")]
    Forbidden(String),

    /// No routing rule matched the request
    #[error("not supported: {0}")]
    UnsupportedCommand(String),

    /// The request could not be interpreted or rewritten
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error (e.g. a backend body that could not be filtered)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unauthorized error with the given message
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a forbidden error with the given message
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create an unsupported command error with the given message
    pub fn unsupported_command(msg: impl Into<String>) -> Self {
        Self::UnsupportedCommand(msg.into())
    }

    /// Create an invalid request error with the given message
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an internal error with the given message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::UnsupportedCommand(_) => StatusCode::NOT_IMPLEMENTED,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Docker-style error body
        let body = serde_json::json!({
            "message": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<SanitizeError> for Error {
    fn from(e: SanitizeError) -> Self {
        Error::Internal(e.to_string())
    }
}
