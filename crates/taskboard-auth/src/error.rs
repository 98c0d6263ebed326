//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_db::DbError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing authorization token")]
    MissingToken,

    /// Covers malformed tokens, bad signatures and expiry alike
    #[error("Invalid token")]
    InvalidToken,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token encoding error: {0}")]
    TokenEncoding(#[from] jsonwebtoken::errors::Error),

    #[error("Store error: {0}")]
    Store(#[from] DbError),
}

impl AuthError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_)
            | AuthError::DuplicateEmail
            | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Configuration(_)
            | AuthError::PasswordHash(_)
            | AuthError::TokenEncoding(_)
            | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::Store(_) => "STORE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message; internal failures are reported opaquely
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::DuplicateEmail
            | AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Authentication failure: {}", self);
        }

        let body = axum::Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}
