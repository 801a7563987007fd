//! Latest-replay broadcast bus for POI lifecycle events.
//!
//! The bus fans every published [`PoiEvent`] out to all live subscriptions
//! and additionally retains the single most recent event. A subscriber that
//! joins late receives that latest event first, then the live feed — nothing
//! older is replayed.
//!
//! # Delivery semantics
//!
//! - `publish` never blocks and never fails from the caller's perspective.
//! - Per subscriber, delivery order matches publish order (FIFO); no event is
//!   delivered twice within one subscription.
//! - Subscribers are independent: a slow consumer only ever loses *its own*
//!   oldest undelivered events (bounded ring, drop-oldest), never anyone
//!   else's, and never stalls the publisher.
//!
//! # Architecture
//!
//! ```text
//! POI service ──publish──> ┌──────────────┐
//!                          │   EventBus   │
//!                          │ latest: cell │
//!                          │ fan-out ring │
//!                          └───┬───┬───┬──┘
//!                              │   │   │
//!                           ws #1  ... ws #N   (one stream per connection)
//! ```

use crate::event::PoiEvent;
use async_stream::stream;
use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Default per-subscriber ring capacity.
///
/// A subscriber that falls more than this many events behind starts losing
/// its oldest undelivered events.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Stream of events handed to one subscriber.
///
/// Each call to [`EventBus::subscribe`] produces a fresh, independent stream.
/// Dropping the stream releases the subscription; the bus reclaims the slot.
pub type EventStream = Pin<Box<dyn Stream<Item = PoiEvent> + Send>>;

/// In-process multicast channel with latest-replay semantics.
///
/// Cheap to clone; clones share the same latest cell and fan-out ring.
/// Constructed explicitly (empty latest, no subscribers) and passed to
/// publishers and connection handlers — there is no implicit global bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

#[derive(Debug)]
struct BusInner {
    /// Most recently published event, replayed to late joiners.
    latest: Mutex<Option<PoiEvent>>,
    /// Live fan-out. Each receiver owns a bounded ring; a lagging receiver
    /// drops its own oldest entries without affecting the sender.
    sender: broadcast::Sender<PoiEvent>,
}

impl EventBus {
    /// Create a bus with [`DEFAULT_BUS_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// Create a bus with an explicit per-subscriber ring capacity.
    ///
    /// A capacity of zero is bumped to one: the bus always keeps room for at
    /// least the latest event.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                latest: Mutex::new(None),
                sender,
            }),
        }
    }

    /// Publish an event to all live subscribers.
    ///
    /// Non-blocking and infallible: with zero subscribers the event is still
    /// retained as "latest" for future subscribers, and a full subscriber
    /// ring is that subscriber's problem alone (its oldest entries are
    /// dropped), never the publisher's.
    pub fn publish(&self, event: PoiEvent) {
        let mut latest = self.lock_latest();
        *latest = Some(event.clone());
        // Send while holding the latest lock so a concurrent subscribe()
        // observes this event exactly once: either as the replayed latest or
        // on its live ring, never both and never neither.
        let delivered = self.inner.sender.send(event).unwrap_or(0);
        trace!(subscribers = delivered, "published POI event");
    }

    /// Subscribe to the event feed.
    ///
    /// The returned stream first yields the most recently published event, if
    /// any exists, then subsequently published events in publish order. Each
    /// call returns an independent stream; drop it to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        // Snapshot the latest cell and create the live receiver under the
        // same lock publish holds. See publish() for the invariant.
        let (replay, mut rx) = {
            let latest = self.lock_latest();
            (latest.clone(), self.inner.sender.subscribe())
        };

        Box::pin(stream! {
            if let Some(event) = replay {
                yield event;
            }
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // This subscriber fell behind; its oldest entries
                        // were dropped. The stream resumes from what remains.
                        warn!(missed, "slow subscriber dropped events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Number of currently live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    fn lock_latest(&self) -> std::sync::MutexGuard<'_, Option<PoiEvent>> {
        // The critical section is a clone and a ring push; recover the guard
        // on poison rather than propagating a panic across connections.
        self.inner
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::event::PoiEventKind;
    use crate::poi::Poi;
    use futures::{FutureExt, StreamExt};
    use uuid::Uuid;

    fn event(name: &str) -> PoiEvent {
        PoiEvent::new(
            PoiEventKind::Created,
            Poi::new(Uuid::new_v4(), name, 0.0, 0.0),
        )
    }

    #[tokio::test]
    async fn test_late_joiner_replays_latest_only() {
        let bus = EventBus::new();
        bus.publish(event("p1"));
        bus.publish(event("p2"));
        bus.publish(event("p3"));

        let mut stream = bus.subscribe();
        bus.publish(event("p4"));
        bus.publish(event("p5"));

        // Latest at join time (p3) first, then the live feed, nothing older.
        let names: Vec<String> = (0..3)
            .map(|_| stream.next().now_or_never().unwrap().unwrap().poi.name)
            .collect();
        assert_eq!(names, vec!["p3", "p4", "p5"]);
    }

    #[tokio::test]
    async fn test_subscriber_before_first_publish_sees_nothing_then_first() {
        let bus = EventBus::new();
        let mut stream = bus.subscribe();

        // Nothing has been published: the stream is pending.
        assert!(stream.next().now_or_never().is_none());

        bus.publish(event("first"));
        let received = stream.next().await.unwrap();
        assert_eq!(received.poi.name, "first");
    }

    #[tokio::test]
    async fn test_publish_with_no_subscribers_is_retained() {
        let bus = EventBus::new();
        bus.publish(event("orphan"));
        assert_eq!(bus.subscriber_count(), 0);

        let mut stream = bus.subscribe();
        let received = stream.next().await.unwrap();
        assert_eq!(received.kind, PoiEventKind::Created);
        assert_eq!(received.poi.name, "orphan");
    }

    #[tokio::test]
    async fn test_two_subscribers_see_same_order() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        for name in ["e1", "e2", "e3"] {
            bus.publish(event(name));
        }

        let collect = |s: &mut EventStream| -> Vec<String> {
            (0..3)
                .map(|_| s.next().now_or_never().unwrap().unwrap().poi.name)
                .collect()
        };
        let got_a = collect(&mut a);
        let got_b = collect(&mut b);
        assert_eq!(got_a, vec!["e1", "e2", "e3"]);
        assert_eq!(got_a, got_b);
    }

    #[tokio::test]
    async fn test_no_duplicate_around_subscription_point() {
        let bus = EventBus::new();
        bus.publish(event("only"));

        let mut stream = bus.subscribe();
        let first = stream.next().await.unwrap();
        assert_eq!(first.poi.name, "only");
        // The replayed event must not also arrive on the live ring.
        assert!(stream.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_dropping_stream_releases_subscription() {
        let bus = EventBus::new();
        let stream = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(stream);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_subscriber_drops_only_its_own_oldest() {
        let bus = EventBus::with_capacity(2);
        let mut slow = bus.subscribe();

        for i in 0..5 {
            bus.publish(event(&format!("e{i}")));
        }

        // Ring capacity 2: the slow subscriber lost e0..e2 and resumes at e3.
        let first = slow.next().await.unwrap();
        assert_eq!(first.poi.name, "e3");
        let second = slow.next().await.unwrap();
        assert_eq!(second.poi.name, "e4");

        // A fresh subscriber is unaffected and still replays the latest.
        let mut fresh = bus.subscribe();
        assert_eq!(fresh.next().await.unwrap().poi.name, "e4");
    }

    #[tokio::test]
    async fn test_publish_from_many_tasks() {
        let bus = EventBus::new();
        let mut stream = bus.subscribe();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let bus = bus.clone();
                tokio::spawn(async move {
                    bus.publish(event(&format!("task-{i}")));
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // All eight arrive; relative order across tasks is unspecified.
        let mut seen = std::collections::HashSet::new();
        for _ in 0..8 {
            seen.insert(stream.next().await.unwrap().poi.name);
        }
        assert_eq!(seen.len(), 8);
    }
}
