//! In-memory refresh-token store.

use crate::error::Result;
use crate::token::{RefreshToken, RefreshTokenStore};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// In-memory [`RefreshTokenStore`] keyed by token value.
///
/// Backed by a [`DashMap`], so every single-token update happens under that
/// token's entry lock and tokens never contend with each other. Suitable for
/// tests and single-process deployments; a relational backend satisfies the
/// same contract in production.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    tokens: std::sync::Arc<DashMap<String, RefreshToken>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held, regardless of state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl RefreshTokenStore for MemoryTokenStore {
    async fn insert(&self, token: RefreshToken) -> Result<()> {
        self.tokens.insert(token.token.clone(), token);
        Ok(())
    }

    async fn find(&self, token_value: &str) -> Result<Option<RefreshToken>> {
        Ok(self.tokens.get(token_value).map(|entry| entry.clone()))
    }

    async fn rotate(
        &self,
        old_token_value: &str,
        replacement: RefreshToken,
    ) -> Result<Option<RefreshToken>> {
        let now = Utc::now();
        {
            let Some(mut entry) = self.tokens.get_mut(old_token_value) else {
                return Ok(None);
            };
            if !entry.is_usable(now) {
                return Ok(None);
            }
            // Revoke inside the predecessor's entry lock: a concurrent rotate
            // of the same value observes it unusable from here on, and there
            // is no instant where predecessor and successor are both usable.
            entry.revoked = true;
        }
        let stored = replacement.clone();
        self.tokens.insert(replacement.token.clone(), replacement);
        Ok(Some(stored))
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64> {
        let mut revoked = 0;
        for mut entry in self.tokens.iter_mut() {
            if entry.user_id == user_id && !entry.revoked {
                entry.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn revoke_all(&self) -> Result<u64> {
        let mut revoked = 0;
        for mut entry in self.tokens.iter_mut() {
            if !entry.revoked {
                entry.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut removed = 0;
        self.tokens.retain(|_, token| {
            let keep = token.expires_at >= now;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}
