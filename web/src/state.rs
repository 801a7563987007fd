//! Shared application state for handlers.

use std::sync::Arc;
use waypoint_auth::SessionManager;
use waypoint_core::EventBus;

/// State shared by every handler: the event bus and the session manager.
///
/// Generic over the verifier and token store so the same handlers serve
/// mocks in tests and real backends in production.
#[derive(Debug)]
pub struct AppState<V, S> {
    /// Event bus feeding the notification gateway.
    pub bus: EventBus,
    /// Session lifecycle orchestration.
    pub sessions: Arc<SessionManager<V, S>>,
}

impl<V, S> AppState<V, S> {
    /// Assemble application state.
    #[must_use]
    pub fn new(bus: EventBus, sessions: SessionManager<V, S>) -> Self {
        Self {
            bus,
            sessions: Arc::new(sessions),
        }
    }
}

// Manual impl: cloning shares the bus and session manager and must not
// require V: Clone or S: Clone.
impl<V, S> Clone for AppState<V, S> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
            sessions: Arc::clone(&self.sessions),
        }
    }
}
