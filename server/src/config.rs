//! Server configuration from environment variables.

use chrono::Duration;
use waypoint_auth::{LockoutConfig, SessionConfig};
use waypoint_core::DEFAULT_BUS_CAPACITY;

/// Runtime configuration for the server binary.
///
/// Every value has a default; environment variables override:
///
/// | Variable | Default |
/// |---|---|
/// | `WAYPOINT_BIND` | `127.0.0.1:8080` |
/// | `WAYPOINT_BUS_CAPACITY` | `256` |
/// | `WAYPOINT_LOCKOUT_MAX_FAILURES` | `5` |
/// | `WAYPOINT_LOCKOUT_MINUTES` | `15` |
/// | `WAYPOINT_TOKEN_TTL_DAYS` | `30` |
/// | `WAYPOINT_SWEEP_INTERVAL_SECS` | `3600` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,
    /// Per-subscriber event ring capacity.
    pub bus_capacity: usize,
    /// Account-lockout thresholds.
    pub lockout: LockoutConfig,
    /// Refresh-token lifetime.
    pub session: SessionConfig,
    /// How often the expired-token sweep runs.
    pub sweep_interval: std::time::Duration,
}

impl ServerConfig {
    /// Load configuration, applying environment overrides to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind: env_var("WAYPOINT_BIND").unwrap_or(defaults.bind),
            bus_capacity: parse_env("WAYPOINT_BUS_CAPACITY").unwrap_or(defaults.bus_capacity),
            lockout: LockoutConfig::new(
                parse_env("WAYPOINT_LOCKOUT_MAX_FAILURES")
                    .unwrap_or(defaults.lockout.max_failed_attempts),
                parse_env("WAYPOINT_LOCKOUT_MINUTES")
                    .map_or(defaults.lockout.lock_duration, Duration::minutes),
            ),
            session: SessionConfig::new(
                parse_env("WAYPOINT_TOKEN_TTL_DAYS")
                    .map_or(defaults.session.refresh_token_ttl, Duration::days),
            ),
            sweep_interval: parse_env("WAYPOINT_SWEEP_INTERVAL_SECS")
                .map_or(defaults.sweep_interval, std::time::Duration::from_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
            lockout: LockoutConfig::default(),
            session: SessionConfig::default(),
            sweep_interval: std::time::Duration::from_secs(3600),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_var(name).and_then(|v| v.parse().ok())
}
