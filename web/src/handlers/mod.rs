//! HTTP and WebSocket handlers.

pub mod notifications;
pub mod session;
