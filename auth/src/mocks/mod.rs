//! Mock providers for testing.
//!
//! Available under the `test-utils` feature (enabled by default) so
//! downstream crates can drive the session layer without a user database.

mod verifier;

pub use verifier::MockVerifier;
