//! WebSocket notification gateway.
//!
//! Bridges one client connection to the [`EventBus`]: subscribe on upgrade,
//! serialize each event to a text frame, push it unsolicited to the client.
//!
//! # Architecture
//!
//! ```text
//! POI service        EventBus          Gateway            Client
//!      │                │                 │                  │
//!      ├─ publish ─────>│                 │                  │
//!      │                │   (upgrade) ────┼<─── Connect ─────┤
//!      │                │<── subscribe ───┤                  │
//!      │                ├── event ───────>├── {type,payload}>│
//! ```
//!
//! # Failure handling
//!
//! - Serialization failure: logged, the one event is skipped, the
//!   subscription survives.
//! - Transport write failure or client close: this gateway's subscription
//!   ends and its bus slot is released; the bus and every other subscriber
//!   are untouched.

use crate::state::AppState;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use chrono::{DateTime, Utc};
use futures::{SinkExt, stream::StreamExt};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use waypoint_auth::{CredentialVerifier, RefreshTokenStore};
use waypoint_core::{EventBus, Poi, PoiEvent, PoiEventKind};

/// Wire frame pushed to clients for each delivered event.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationFrame<'a> {
    /// Lifecycle kind, e.g. `CREATED`.
    #[serde(rename = "type")]
    pub kind: PoiEventKind,
    /// POI snapshot after the change.
    pub payload: &'a Poi,
}

impl<'a> NotificationFrame<'a> {
    /// Borrow a frame view over an event.
    #[must_use]
    pub const fn from_event(event: &'a PoiEvent) -> Self {
        Self {
            kind: event.kind,
            payload: &event.poi,
        }
    }
}

/// One client's registration on the event stream.
///
/// Owned exclusively by its gateway task; dropping the gateway's stream
/// handle ends the subscription.
#[derive(Debug, Clone, Copy)]
struct Subscription {
    session_id: Uuid,
    opened_at: DateTime<Utc>,
}

impl Subscription {
    fn open() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            opened_at: Utc::now(),
        }
    }
}

/// Upgrade handler for `GET /ws`.
#[allow(clippy::unused_async)] // Axum handler signature requires async
pub async fn handle<V, S>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<V, S>>,
) -> Response
where
    V: CredentialVerifier + 'static,
    S: RefreshTokenStore + 'static,
{
    let bus = state.bus.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, bus))
}

/// Drive one WebSocket connection for its whole lifetime.
///
/// Two concurrent tasks, joined by `select!` with mutual abort:
/// 1. **Sender**: pump bus events to the client
/// 2. **Receiver**: drain client messages, watching for close
async fn handle_socket(socket: WebSocket, bus: EventBus) {
    let subscription = Subscription::open();
    let session_id = subscription.session_id;
    info!(%session_id, opened_at = %subscription.opened_at, "notification session established");

    let (mut sender, mut receiver) = socket.split();
    let mut events = bus.subscribe();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let text = match serde_json::to_string(&NotificationFrame::from_event(&event)) {
                Ok(json) => json,
                Err(e) => {
                    // Skip this one event; the subscription stays live.
                    error!(%session_id, error = %e, kind = ?event.kind, "failed to serialize event");
                    continue;
                }
            };

            if sender.send(Message::Text(text)).await.is_err() {
                // Transport failure: terminate only this connection.
                warn!(%session_id, "transport write failed, closing notification session");
                break;
            }
        }
        // Dropping `events` here releases the bus subscription.
        debug!(%session_id, "notification send task terminated");
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => {
                    info!(%session_id, "client closed notification session");
                    break;
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Axum answers pings automatically.
                }
                Message::Text(_) | Message::Binary(_) => {
                    // The notification stream is one-way.
                    debug!(%session_id, "ignoring inbound message on notification stream");
                }
            }
        }
        debug!(%session_id, "notification receive task terminated");
    });

    // Whichever side ends first tears down the other.
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        },
        _ = (&mut recv_task) => {
            send_task.abort();
        },
    }

    info!(%session_id, "notification session closed");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn test_frame_wire_shape() {
        let poi = Poi::new(
            Uuid::parse_str("6f0f1c9e-3b7a-4a58-9a30-000000000001").unwrap(),
            "Alki Beach",
            47.581,
            -122.409,
        );
        let event = PoiEvent::new(PoiEventKind::Reviewed, poi);

        let json = serde_json::to_string(&NotificationFrame::from_event(&event)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "REVIEWED");
        assert_eq!(value["payload"]["name"], "Alki Beach");
        assert_eq!(
            value["payload"]["id"],
            "6f0f1c9e-3b7a-4a58-9a30-000000000001"
        );
    }

    #[test]
    fn test_subscriptions_get_unique_session_ids() {
        let a = Subscription::open();
        let b = Subscription::open();
        assert_ne!(a.session_id, b.session_id);
    }
}
