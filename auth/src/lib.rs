//! # Waypoint Authentication
//!
//! Refresh-token session lifecycle and account-lockout protection for the
//! Waypoint platform.
//!
//! ## Components
//!
//! - [`LockoutGuard`] — per-account failed-attempt tracking with a temporary
//!   lock once a configured threshold is crossed
//! - [`RefreshTokenStore`] — storage contract for refresh tokens, with an
//!   in-memory reference implementation in [`stores`]
//! - [`CredentialVerifier`] — opaque password verification contract
//! - [`SessionManager`] — orchestrates login, token rotation, revocation and
//!   expiry sweeps on top of the other three
//!
//! ## Flow
//!
//! ```text
//! login ──> LockoutGuard.check ──> CredentialVerifier.verify
//!                │ locked                 │ ok          │ mismatch
//!                ▼                        ▼             ▼
//!        AccountLocked(until)      issue token    record_failure
//! ```
//!
//! All expiry and lock decisions are lazy wall-clock comparisons; no
//! background timer is required for correctness. A periodic
//! [`SessionManager::sweep_expired`] keeps the store tidy.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod lockout;
pub mod session;
pub mod stores;
pub mod token;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use config::{LockoutConfig, SessionConfig};
pub use error::{AuthError, Result};
pub use lockout::LockoutGuard;
pub use session::SessionManager;
pub use token::{RefreshToken, RefreshTokenStore};
pub use verifier::{CredentialVerifier, Credentials};
