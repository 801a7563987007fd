//! Mock credential verifier.

use crate::error::Result;
use crate::verifier::CredentialVerifier;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// In-memory [`CredentialVerifier`] with plain-text passwords.
///
/// Test double only; nothing is hashed.
#[derive(Debug, Clone, Default)]
pub struct MockVerifier {
    users: Arc<Mutex<HashMap<String, (Uuid, String)>>>,
}

impl MockVerifier {
    /// Create an empty verifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return its user id.
    pub fn register(&self, email_or_username: impl Into<String>, password: impl Into<String>) -> Uuid {
        let user_id = Uuid::new_v4();
        self.lock()
            .insert(email_or_username.into(), (user_id, password.into()));
        user_id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Uuid, String)>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialVerifier for MockVerifier {
    async fn verify(&self, email_or_username: &str, password: &str) -> Result<Option<Uuid>> {
        Ok(self
            .lock()
            .get(email_or_username)
            .filter(|(_, stored)| stored == password)
            .map(|(user_id, _)| *user_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_matches_registered_password() {
        let verifier = MockVerifier::new();
        let id = verifier.register("alice", "correct horse");

        assert_eq!(verifier.verify("alice", "correct horse").await.unwrap(), Some(id));
        assert_eq!(verifier.verify("alice", "wrong").await.unwrap(), None);
        assert_eq!(verifier.verify("nobody", "anything").await.unwrap(), None);
    }
}
