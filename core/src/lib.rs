//! # Waypoint Core
//!
//! Domain types and the real-time distribution primitive for the Waypoint
//! points-of-interest platform:
//!
//! - [`Poi`] — an immutable snapshot of a point of interest
//! - [`PoiEvent`] / [`PoiEventKind`] — lifecycle events emitted on every
//!   state-changing POI operation
//! - [`EventBus`] — an in-process latest-replay broadcast channel that fans
//!   events out to every connected client session
//!
//! The bus is an explicitly constructed value, not a process-wide singleton:
//! the application builds one [`EventBus`], hands clones to the POI write
//! path (publisher) and to each connection handler (subscribers), and drops
//! it on shutdown.
//!
//! ## Example
//!
//! ```
//! use waypoint_core::{EventBus, Poi, PoiEvent, PoiEventKind};
//! use futures::StreamExt;
//! use uuid::Uuid;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new();
//! let poi = Poi::new(Uuid::new_v4(), "Ferry Terminal", 47.602, -122.339);
//! bus.publish(PoiEvent::new(PoiEventKind::Created, poi.clone()));
//!
//! // A late joiner still sees the most recent event first.
//! let mut stream = bus.subscribe();
//! let replayed = stream.next().await.unwrap();
//! assert_eq!(replayed.kind, PoiEventKind::Created);
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod bus;
pub mod event;
pub mod poi;

pub use bus::{EventBus, EventStream, DEFAULT_BUS_CAPACITY};
pub use event::{PoiEvent, PoiEventKind};
pub use poi::Poi;
