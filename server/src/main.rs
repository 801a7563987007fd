//! Waypoint realtime/session server.
//!
//! Wires the event bus, session manager, and web handlers into one axum
//! process:
//! - `GET /ws` — live POI notification stream
//! - `POST /auth/login`, `POST /auth/refresh` — session lifecycle
//! - `POST /auth/revoke`, `POST /auth/revoke-all`, `DELETE /auth/expired` —
//!   token maintenance
//!
//! A background task sweeps expired refresh tokens on a configurable
//! interval. Accounts come from the in-memory mock verifier seeded via
//! `WAYPOINT_DEMO_USER` / `WAYPOINT_DEMO_PASSWORD`; a production deployment
//! substitutes its user-store-backed `CredentialVerifier`.

mod config;

use anyhow::Context as _;
use config::ServerConfig;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use waypoint_auth::mocks::MockVerifier;
use waypoint_auth::stores::MemoryTokenStore;
use waypoint_auth::{LockoutGuard, SessionManager};
use waypoint_core::EventBus;
use waypoint_web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env();
    info!(?config, "starting waypoint server");

    let bus = EventBus::with_capacity(config.bus_capacity);

    let verifier = MockVerifier::new();
    let demo_user =
        std::env::var("WAYPOINT_DEMO_USER").unwrap_or_else(|_| "demo".to_string());
    let demo_password =
        std::env::var("WAYPOINT_DEMO_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());
    let demo_id = verifier.register(demo_user.as_str(), demo_password);
    info!(user = %demo_user, user_id = %demo_id, "registered demo account");

    let sessions = SessionManager::new(
        verifier,
        MemoryTokenStore::new(),
        LockoutGuard::new(config.lockout.clone()),
        config.session.clone(),
    );
    let state = AppState::new(bus, sessions);

    spawn_sweep_task(Arc::clone(&state.sessions), config.sweep_interval);

    let app = waypoint_web::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(bind = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

/// Periodic expired-token sweep. Storage hygiene only; expiry itself is
/// enforced lazily at check time.
fn spawn_sweep_task(
    sessions: Arc<SessionManager<MockVerifier, MemoryTokenStore>>,
    interval: std::time::Duration,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The immediate first tick is fine: sweeping an empty store is a noop.
        loop {
            ticker.tick().await;
            match sessions.sweep_expired().await {
                Ok(removed) if removed > 0 => {
                    info!(removed, "swept expired refresh tokens");
                }
                Ok(_) => {}
                Err(e) => error!(error = %e, "expired-token sweep failed"),
            }
        }
    });
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install shutdown signal handler");
    }
    info!("shutdown signal received");
}
