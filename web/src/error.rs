//! Error types for web handlers.
//!
//! Bridges the typed domain errors to HTTP responses via Axum's
//! `IntoResponse`. Auth failures stay distinguishable on the wire so clients
//! can render a lock countdown instead of a generic "wrong password".

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use waypoint_auth::AuthError;

/// Application error type for web handlers.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Lock expiry, present only for account-lockout responses
    locked_until: Option<DateTime<Utc>>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            locked_until: None,
            source: None,
        }
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into(), code.into())
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 423 Locked error carrying the lock expiry.
    #[must_use]
    pub fn locked(until: DateTime<Utc>) -> Self {
        let mut error = Self::new(
            StatusCode::LOCKED,
            format!("Account locked until {until}"),
            "ACCOUNT_LOCKED".to_string(),
        );
        error.locked_until = Some(until);
        error
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Attach a source error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AccountLocked { until } => Self::locked(until),
            AuthError::InvalidCredentials => {
                Self::unauthorized("Invalid credentials", "INVALID_CREDENTIALS")
            }
            AuthError::TokenInvalid => {
                Self::unauthorized("Invalid refresh token", "TOKEN_INVALID")
            }
            AuthError::Validation { field } => {
                Self::validation(format!("Missing required field: {field}"))
            }
            AuthError::Storage(reason) => {
                Self::internal("An internal error occurred").with_source(anyhow::anyhow!(reason))
            }
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
    /// Lock expiry, only on `ACCOUNT_LOCKED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    locked_until: Option<DateTime<Utc>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                message = %self.message,
                source = ?self.source,
                "Internal server error"
            );
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            locked_until: self.locked_until,
        };

        (self.status, Json(body)).into_response()
    }
}
