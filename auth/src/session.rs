//! Session lifecycle orchestration.

use crate::config::SessionConfig;
use crate::error::{AuthError, Result};
use crate::lockout::LockoutGuard;
use crate::token::{RefreshToken, RefreshTokenStore};
use crate::verifier::{CredentialVerifier, Credentials};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Issues, rotates, and revokes refresh tokens, consulting the
/// [`LockoutGuard`] before any credential check.
///
/// Generic over the credential verifier and the token store so the same
/// orchestration runs against mocks in tests and real backends in
/// production.
#[derive(Debug)]
pub struct SessionManager<V, S> {
    verifier: V,
    store: S,
    lockout: LockoutGuard,
    config: SessionConfig,
}

impl<V, S> SessionManager<V, S>
where
    V: CredentialVerifier,
    S: RefreshTokenStore,
{
    /// Create a session manager.
    #[must_use]
    pub const fn new(verifier: V, store: S, lockout: LockoutGuard, config: SessionConfig) -> Self {
        Self {
            verifier,
            store,
            lockout,
            config,
        }
    }

    /// Authenticate and issue a refresh token.
    ///
    /// A locked account fails before credentials are even looked at; a
    /// credential mismatch accrues toward the lockout threshold; a success
    /// resets the account's failure counter.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] on blank fields
    /// - [`AuthError::AccountLocked`] while the account is locked (including
    ///   the attempt that crosses the threshold)
    /// - [`AuthError::InvalidCredentials`] on a mismatch below the threshold
    /// - [`AuthError::Storage`] if a backend fails
    pub async fn login(&self, credentials: &Credentials) -> Result<RefreshToken> {
        credentials.validate()?;
        let account = credentials.email_or_username.as_str();
        self.lockout.check(account)?;

        match self
            .verifier
            .verify(account, &credentials.password)
            .await?
        {
            Some(user_id) => {
                self.lockout.record_success(account);
                let token = RefreshToken::issue(user_id, self.config.refresh_token_ttl);
                self.store.insert(token.clone()).await?;
                info!(%user_id, "login succeeded, refresh token issued");
                Ok(token)
            }
            None => {
                debug!(account, "credential mismatch");
                match self.lockout.record_failure(account) {
                    Some(until) => Err(AuthError::AccountLocked { until }),
                    None => Err(AuthError::InvalidCredentials),
                }
            }
        }
    }

    /// Exchange a refresh token for a fresh one bound to the same user.
    ///
    /// The predecessor is revoked atomically with issuing the successor: at
    /// no instant are both usable, and each token value rotates at most
    /// once.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenInvalid`] when the token is absent, revoked, or
    ///   expired
    /// - [`AuthError::Storage`] if the backend fails
    pub async fn rotate(&self, token_value: &str) -> Result<RefreshToken> {
        let current = self
            .store
            .find(token_value)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        let replacement = RefreshToken::issue(current.user_id, self.config.refresh_token_ttl);
        // The store re-validates the predecessor inside its own atomic step;
        // the find above only supplied the user binding.
        self.store
            .rotate(token_value, replacement)
            .await?
            .ok_or(AuthError::TokenInvalid)
    }

    /// Revoke every token for one user (logout everywhere, credential
    /// change). Returns how many tokens were newly revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backend fails.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64> {
        let revoked = self.store.revoke_all_for_user(user_id).await?;
        info!(%user_id, revoked, "revoked all tokens for user");
        Ok(revoked)
    }

    /// Revoke every token in the store (security-incident response).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backend fails.
    pub async fn revoke_all(&self) -> Result<u64> {
        let revoked = self.store.revoke_all().await?;
        info!(revoked, "revoked all tokens");
        Ok(revoked)
    }

    /// Delete tokens whose expiry has passed. Background maintenance, not a
    /// request-path operation.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backend fails.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let removed = self.store.delete_expired(Utc::now()).await?;
        if removed > 0 {
            debug!(removed, "swept expired refresh tokens");
        }
        Ok(removed)
    }

    /// The lockout guard, for observability.
    #[must_use]
    pub const fn lockout(&self) -> &LockoutGuard {
        &self.lockout
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::config::LockoutConfig;
    use crate::mocks::MockVerifier;
    use crate::stores::MemoryTokenStore;
    use chrono::Duration;

    fn manager(lockout: LockoutConfig) -> (SessionManager<MockVerifier, MemoryTokenStore>, Uuid) {
        let verifier = MockVerifier::new();
        let user_id = verifier.register("alice", "correct horse");
        let manager = SessionManager::new(
            verifier,
            MemoryTokenStore::new(),
            LockoutGuard::new(lockout),
            SessionConfig::default(),
        );
        (manager, user_id)
    }

    #[tokio::test]
    async fn test_login_issues_token_for_valid_credentials() {
        let (manager, user_id) = manager(LockoutConfig::default());
        let token = manager
            .login(&Credentials::new("alice", "correct horse"))
            .await
            .unwrap();
        assert_eq!(token.user_id, user_id);
        assert!(token.is_usable(Utc::now()));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let (manager, _) = manager(LockoutConfig::default());
        let result = manager.login(&Credentials::new("alice", "nope")).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_rejects_blank_fields_without_accrual() {
        let (manager, _) = manager(LockoutConfig::default());
        let result = manager.login(&Credentials::new("", "pw")).await;
        assert!(matches!(result, Err(AuthError::Validation { .. })));
        assert_eq!(manager.lockout().failed_attempts(""), 0);
    }

    #[tokio::test]
    async fn test_locked_account_rejects_correct_password() {
        let (manager, _) = manager(LockoutConfig::new(3, Duration::minutes(15)));

        for _ in 0..2 {
            let _ = manager.login(&Credentials::new("alice", "wrong")).await;
        }
        // Third failure crosses the threshold.
        let crossing = manager.login(&Credentials::new("alice", "wrong")).await;
        assert!(matches!(crossing, Err(AuthError::AccountLocked { .. })));

        // Correct credentials are not even verified while locked.
        let locked_out = manager
            .login(&Credentials::new("alice", "correct horse"))
            .await;
        assert!(matches!(locked_out, Err(AuthError::AccountLocked { .. })));
    }

    #[tokio::test]
    async fn test_success_resets_failure_counter() {
        let (manager, _) = manager(LockoutConfig::new(3, Duration::minutes(15)));

        let _ = manager.login(&Credentials::new("alice", "wrong")).await;
        let _ = manager.login(&Credentials::new("alice", "wrong")).await;
        manager
            .login(&Credentials::new("alice", "correct horse"))
            .await
            .unwrap();
        assert_eq!(manager.lockout().failed_attempts("alice"), 0);
    }

    #[tokio::test]
    async fn test_rotate_chains_and_invalidates_predecessor() {
        let (manager, user_id) = manager(LockoutConfig::default());
        let first = manager
            .login(&Credentials::new("alice", "correct horse"))
            .await
            .unwrap();

        let second = manager.rotate(&first.token).await.unwrap();
        assert_eq!(second.user_id, user_id);
        assert_ne!(second.token, first.token);

        // Any further use of the predecessor fails.
        assert_eq!(
            manager.rotate(&first.token).await,
            Err(AuthError::TokenInvalid)
        );
        // The successor still rotates.
        manager.rotate(&second.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_rotate_unknown_token() {
        let (manager, _) = manager(LockoutConfig::default());
        assert_eq!(
            manager.rotate("never-issued").await,
            Err(AuthError::TokenInvalid)
        );
    }

    #[tokio::test]
    async fn test_revoke_all_for_user_blocks_rotation() {
        let (manager, user_id) = manager(LockoutConfig::default());
        let token = manager
            .login(&Credentials::new("alice", "correct horse"))
            .await
            .unwrap();

        assert_eq!(manager.revoke_all_for_user(user_id).await.unwrap(), 1);
        assert_eq!(
            manager.rotate(&token.token).await,
            Err(AuthError::TokenInvalid)
        );
    }
}
