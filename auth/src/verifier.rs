//! Credential verification contract.
//!
//! Password hashing lives behind this trait as an opaque verifier; the
//! session layer only learns "which user, if any" from a credential pair.

use crate::error::{AuthError, Result};
use uuid::Uuid;

/// Login credentials as accepted at the boundary.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Credentials {
    /// Email address or username; non-blank.
    pub email_or_username: String,
    /// Plain-text password; non-blank, never logged.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(email_or_username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email_or_username: email_or_username.into(),
            password: password.into(),
        }
    }

    /// Reject blank fields before any store or verifier is consulted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] naming the blank field.
    pub fn validate(&self) -> Result<()> {
        if self.email_or_username.trim().is_empty() {
            return Err(AuthError::Validation {
                field: "email_or_username",
            });
        }
        if self.password.trim().is_empty() {
            return Err(AuthError::Validation { field: "password" });
        }
        Ok(())
    }
}

/// Opaque password verifier.
///
/// Implementations compare the supplied password against the stored hash for
/// the named account and return the account's user id on a match. Hashing
/// scheme and user storage are implementation details.
pub trait CredentialVerifier: Send + Sync {
    /// Verify a credential pair.
    ///
    /// Returns `Some(user_id)` on a match, `None` on an unknown account or a
    /// wrong password — callers must not be able to tell those apart.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the user backend fails.
    fn verify(
        &self,
        email_or_username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Option<Uuid>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_rejected() {
        let missing_user = Credentials::new("  ", "hunter2");
        assert_eq!(
            missing_user.validate(),
            Err(AuthError::Validation {
                field: "email_or_username"
            })
        );

        let missing_password = Credentials::new("alice", "");
        assert_eq!(
            missing_password.validate(),
            Err(AuthError::Validation { field: "password" })
        );

        assert!(Credentials::new("alice", "hunter2").validate().is_ok());
    }
}
