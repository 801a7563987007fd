//! POI lifecycle events.
//!
//! Every state-changing operation on a point of interest produces exactly one
//! [`PoiEvent`]. Events are transient: they exist only for the duration of a
//! broadcast (plus the bus's single "latest" slot) and are never persisted.

use crate::poi::Poi;
use serde::{Deserialize, Serialize};

/// The kind of lifecycle change an event describes.
///
/// Serialized in wire frames as the upper-case kind name
/// (`CREATED`, `UPDATED`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoiEventKind {
    /// A new POI was created.
    Created,
    /// An existing POI was edited.
    Updated,
    /// A POI was deleted.
    Deleted,
    /// A previously hidden POI became visible.
    Activated,
    /// A POI was hidden from clients.
    Deactivated,
    /// A review was added to a POI.
    Reviewed,
    /// A user liked a POI.
    Liked,
    /// A user removed their like.
    Unliked,
    /// A POI detail view was recorded.
    Viewed,
}

/// A single lifecycle event paired with the POI snapshot it concerns.
///
/// Immutable once constructed. Cloned freely across subscribers; the snapshot
/// is shared read-only data, never a live handle into storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiEvent {
    /// What happened.
    pub kind: PoiEventKind,
    /// Snapshot of the POI after the change.
    pub poi: Poi,
}

impl PoiEvent {
    /// Create a new event.
    #[must_use]
    pub const fn new(kind: PoiEventKind, poi: Poi) -> Self {
        Self { kind, poi }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_kind_wire_names() {
        let cases = [
            (PoiEventKind::Created, "\"CREATED\""),
            (PoiEventKind::Updated, "\"UPDATED\""),
            (PoiEventKind::Deleted, "\"DELETED\""),
            (PoiEventKind::Activated, "\"ACTIVATED\""),
            (PoiEventKind::Deactivated, "\"DEACTIVATED\""),
            (PoiEventKind::Reviewed, "\"REVIEWED\""),
            (PoiEventKind::Liked, "\"LIKED\""),
            (PoiEventKind::Unliked, "\"UNLIKED\""),
            (PoiEventKind::Viewed, "\"VIEWED\""),
        ];
        for (kind, expected) in cases {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, expected);
            let parsed: PoiEventKind = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_event_round_trip() {
        let poi = Poi::new(Uuid::new_v4(), "Space Needle", 47.620, -122.349);
        let event = PoiEvent::new(PoiEventKind::Liked, poi);
        let json = serde_json::to_string(&event).unwrap();
        let parsed: PoiEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
