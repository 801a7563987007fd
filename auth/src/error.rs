//! Error types for session and authentication operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the session/security lifecycle.
///
/// Lockout and credential failures are distinct variants so the boundary
/// layer can render a lock countdown instead of a generic "wrong password".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    /// Account is temporarily locked after repeated failures.
    ///
    /// Carries the instant the lock expires so clients can display it.
    #[error("Account locked until {until}")]
    AccountLocked {
        /// When authentication attempts become possible again.
        until: DateTime<Utc>,
    },

    /// Credentials did not match. Retryable, subject to lockout accrual.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Refresh token is absent, expired, or revoked.
    ///
    /// Recoverable by re-authenticating. The three causes are deliberately
    /// not distinguished to avoid leaking token state to callers.
    #[error("Invalid refresh token")]
    TokenInvalid,

    /// A required login field was blank.
    #[error("Missing required field: {field}")]
    Validation {
        /// The offending field name.
        field: &'static str,
    },

    /// Backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Returns `true` if this error is caused by user input and safe to
    /// surface verbatim.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(AuthError::InvalidCredentials.is_user_error());
        assert!(AuthError::TokenInvalid.is_user_error());
        assert!(
            AuthError::AccountLocked {
                until: Utc::now()
            }
            .is_user_error()
        );
        assert!(!AuthError::Storage("connection reset".to_string()).is_user_error());
    }

    #[test]
    fn test_display_carries_lock_expiry() {
        let until = Utc::now();
        let message = AuthError::AccountLocked { until }.to_string();
        assert!(message.contains(&until.to_string()));
    }
}
