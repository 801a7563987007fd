//! Per-account lockout protection against credential brute-forcing.

use crate::config::LockoutConfig;
use crate::error::{AuthError, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;

/// Mutable lockout state for one account.
///
/// Created lazily on the first failed attempt; reset in place rather than
/// deleted, so a hot account keeps its map entry.
#[derive(Debug, Default, Clone)]
struct LockoutState {
    failed_attempts: u32,
    locked_until: Option<DateTime<Utc>>,
}

/// Tracks failed authentication attempts per account and decides whether an
/// account is currently locked.
///
/// States per account: `OK` and `LOCKED(until)`. Crossing the configured
/// failure threshold moves the account to `LOCKED`; the lock expires lazily
/// at check time — no background timer is involved.
///
/// # Concurrency
///
/// State lives in a [`DashMap`]; every read-modify-write happens under that
/// account's entry lock, so concurrent failures on one account never under-
/// or over-count, and accounts never contend with each other.
#[derive(Debug)]
pub struct LockoutGuard {
    config: LockoutConfig,
    accounts: DashMap<String, LockoutState>,
}

impl LockoutGuard {
    /// Create a guard with the given thresholds.
    #[must_use]
    pub fn new(config: LockoutConfig) -> Self {
        Self {
            config,
            accounts: DashMap::new(),
        }
    }

    /// Check whether `account` may attempt authentication right now.
    ///
    /// An expired lock is cleared here (lazy expiry) and the attempt is
    /// allowed to proceed to credential verification.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccountLocked`] with the lock expiry while the
    /// account is locked.
    pub fn check(&self, account: &str) -> Result<()> {
        let Some(mut state) = self.accounts.get_mut(account) else {
            return Ok(());
        };
        if let Some(until) = state.locked_until {
            if Utc::now() < until {
                return Err(AuthError::AccountLocked { until });
            }
            // Lock has expired: back to OK with a clean slate.
            state.locked_until = None;
            state.failed_attempts = 0;
        }
        Ok(())
    }

    /// Record a failed authentication attempt.
    ///
    /// Returns the lock expiry if this failure crossed the threshold.
    pub fn record_failure(&self, account: &str) -> Option<DateTime<Utc>> {
        let mut state = self.accounts.entry(account.to_string()).or_default();
        state.failed_attempts += 1;
        if state.failed_attempts >= self.config.max_failed_attempts && state.locked_until.is_none()
        {
            let until = Utc::now() + self.config.lock_duration;
            state.locked_until = Some(until);
            info!(account, %until, "account locked after repeated failures");
            return Some(until);
        }
        state.locked_until
    }

    /// Record a successful authentication: counter back to zero, lock
    /// cleared.
    pub fn record_success(&self, account: &str) {
        if let Some(mut state) = self.accounts.get_mut(account) {
            state.failed_attempts = 0;
            state.locked_until = None;
        }
    }

    /// Current failed-attempt count for an account. Zero if unknown.
    #[must_use]
    pub fn failed_attempts(&self, account: &str) -> u32 {
        self.accounts
            .get(account)
            .map_or(0, |state| state.failed_attempts)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use chrono::Duration;

    fn guard(threshold: u32, lock: Duration) -> LockoutGuard {
        LockoutGuard::new(LockoutConfig::new(threshold, lock))
    }

    #[test]
    fn test_unknown_account_is_ok() {
        let guard = guard(3, Duration::minutes(15));
        assert!(guard.check("nobody").is_ok());
        assert_eq!(guard.failed_attempts("nobody"), 0);
    }

    #[test]
    fn test_threshold_crossing_locks() {
        let guard = guard(3, Duration::minutes(15));

        assert!(guard.record_failure("alice").is_none());
        assert!(guard.record_failure("alice").is_none());
        assert!(guard.check("alice").is_ok());

        let until = guard.record_failure("alice");
        assert!(until.is_some());

        match guard.check("alice") {
            Err(AuthError::AccountLocked { until: reported }) => {
                assert_eq!(Some(reported), until);
            }
            other => panic!("expected AccountLocked, got {other:?}"),
        }
    }

    #[test]
    fn test_lock_expires_lazily() {
        let guard = guard(1, Duration::zero());
        guard.record_failure("bob");

        // Zero lock duration: already expired by the time we check, and the
        // counter starts over.
        assert!(guard.check("bob").is_ok());
        assert_eq!(guard.failed_attempts("bob"), 0);
    }

    #[test]
    fn test_success_resets_counter() {
        let guard = guard(5, Duration::minutes(15));
        guard.record_failure("carol");
        guard.record_failure("carol");
        assert_eq!(guard.failed_attempts("carol"), 2);

        guard.record_success("carol");
        assert_eq!(guard.failed_attempts("carol"), 0);
        assert!(guard.check("carol").is_ok());
    }

    #[test]
    fn test_failures_on_one_account_do_not_lock_another() {
        let guard = guard(2, Duration::minutes(15));
        guard.record_failure("dave");
        guard.record_failure("dave");
        assert!(guard.check("dave").is_err());
        assert!(guard.check("erin").is_ok());
    }

    #[test]
    fn test_concurrent_failures_count_exactly() {
        let guard = std::sync::Arc::new(guard(100, Duration::minutes(15)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = guard.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        guard.record_failure("frank");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(guard.failed_attempts("frank"), 80);
    }
}
