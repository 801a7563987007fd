//! Refresh tokens and the storage contract they live behind.
//!
//! A refresh token is a long-lived opaque credential used to mint new
//! session credentials without re-entering a password. Persistence is an
//! external concern: real deployments back [`RefreshTokenStore`] with a
//! relational table keyed by token value (with a secondary index on user
//! id); [`crate::stores::MemoryTokenStore`] is the in-process reference
//! implementation.

use crate::error::Result;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entropy of a freshly minted token value, in bytes.
const TOKEN_BYTES: usize = 32;

/// A persisted refresh token.
///
/// The token value is globally unique and unguessable. After creation the
/// only mutation a row ever sees is flipping `revoked`; rows are deleted only
/// by the expiry sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Opaque token value; primary lookup key.
    pub token: String,

    /// Owner of the token; secondary lookup key.
    pub user_id: Uuid,

    /// When the token was issued.
    pub issued_at: DateTime<Utc>,

    /// When the token stops being usable.
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked (rotation, logout, incident).
    pub revoked: bool,
}

impl RefreshToken {
    /// Mint a fresh token for `user_id` with the given lifetime.
    #[must_use]
    pub fn issue(user_id: Uuid, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            token: generate_token_value(),
            user_id,
            issued_at: now,
            expires_at: now + ttl,
            revoked: false,
        }
    }

    /// A token is usable for renewal iff it is not revoked and not expired.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && now < self.expires_at
    }
}

/// Generate an unguessable URL-safe token value.
fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Storage contract for refresh tokens.
///
/// Implementations must serialize updates per token (and per user for the
/// bulk operations); one token's rotation never blocks another's.
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend fails.
    fn insert(
        &self,
        token: RefreshToken,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Look up a token by value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend fails.
    fn find(
        &self,
        token_value: &str,
    ) -> impl std::future::Future<Output = Result<Option<RefreshToken>>> + Send;

    /// Atomically rotate `old_token_value` into `replacement`.
    ///
    /// The predecessor must be revoked strictly before the successor becomes
    /// visible: at no instant are both usable. Returns the stored replacement
    /// on success, or `None` when the predecessor is absent, revoked, or
    /// expired (in which case the replacement is discarded).
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend fails.
    fn rotate(
        &self,
        old_token_value: &str,
        replacement: RefreshToken,
    ) -> impl std::future::Future<Output = Result<Option<RefreshToken>>> + Send;

    /// Revoke every token belonging to `user_id`. Returns the number of
    /// tokens newly revoked.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend fails.
    fn revoke_all_for_user(
        &self,
        user_id: Uuid,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Revoke every token in the store (security-incident response).
    /// Returns the number of tokens newly revoked.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend fails.
    fn revoke_all(&self) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Delete every token with `expires_at < now`. Returns the number of
    /// rows removed. Revocation state is irrelevant here; expiry alone
    /// decides deletion.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend fails.
    fn delete_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}
