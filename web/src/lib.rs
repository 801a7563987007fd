//! # Waypoint Web
//!
//! Axum integration for the Waypoint platform:
//!
//! - a WebSocket notification gateway that bridges one client connection to
//!   the [`waypoint_core::EventBus`]
//! - session endpoints (login, refresh-token rotation, revocation,
//!   expiry maintenance) over a generic [`SessionManager`]
//! - HTTP error mapping that keeps the typed auth failures distinguishable,
//!   including the lock expiry timestamp for client countdown display
//!
//! [`SessionManager`]: waypoint_auth::SessionManager

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod handlers;
pub mod state;

pub use error::AppError;
pub use state::AppState;

use axum::Router;
use axum::routing::{delete, get, post};
use waypoint_auth::{CredentialVerifier, RefreshTokenStore};

/// Build the Waypoint router: `/ws` for the notification stream plus the
/// session boundary under `/auth`.
pub fn router<V, S>(state: AppState<V, S>) -> Router
where
    V: CredentialVerifier + 'static,
    S: RefreshTokenStore + 'static,
{
    Router::new()
        .route("/ws", get(handlers::notifications::handle::<V, S>))
        .route("/auth/login", post(handlers::session::login::<V, S>))
        .route("/auth/refresh", post(handlers::session::refresh::<V, S>))
        .route("/auth/revoke", post(handlers::session::revoke_user::<V, S>))
        .route(
            "/auth/revoke-all",
            post(handlers::session::revoke_all::<V, S>),
        )
        .route(
            "/auth/expired",
            delete(handlers::session::delete_expired::<V, S>),
        )
        .with_state(state)
}
