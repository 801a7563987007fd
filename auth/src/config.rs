//! Authentication configuration.
//!
//! Threshold and duration values are configuration, not constants: the
//! application provides them explicitly, with conservative defaults.

use chrono::Duration;

/// Account-lockout configuration.
#[derive(Debug, Clone)]
pub struct LockoutConfig {
    /// Consecutive failed attempts that trigger a lock.
    ///
    /// Default: 5
    pub max_failed_attempts: u32,

    /// How long an account stays locked once the threshold is crossed.
    ///
    /// Default: 15 minutes
    pub lock_duration: Duration,
}

impl LockoutConfig {
    /// Create lockout configuration with explicit values.
    #[must_use]
    pub const fn new(max_failed_attempts: u32, lock_duration: Duration) -> Self {
        Self {
            max_failed_attempts,
            lock_duration,
        }
    }

    /// Set the failure threshold.
    #[must_use]
    pub const fn with_max_failed_attempts(mut self, attempts: u32) -> Self {
        self.max_failed_attempts = attempts;
        self
    }

    /// Set the lock duration.
    #[must_use]
    pub const fn with_lock_duration(mut self, duration: Duration) -> Self {
        self.lock_duration = duration;
        self
    }
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lock_duration: Duration::minutes(15),
        }
    }
}

/// Refresh-token session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime of an issued refresh token.
    ///
    /// Default: 30 days
    pub refresh_token_ttl: Duration,
}

impl SessionConfig {
    /// Create session configuration with an explicit token lifetime.
    #[must_use]
    pub const fn new(refresh_token_ttl: Duration) -> Self {
        Self { refresh_token_ttl }
    }

    /// Set the refresh-token lifetime.
    #[must_use]
    pub const fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_token_ttl: Duration::days(30),
        }
    }
}
