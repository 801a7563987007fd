//! Point-of-interest snapshot type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a point of interest as carried inside lifecycle events.
///
/// A `Poi` is a read-only copy taken at publish time. Subscribers never
/// observe later mutations of the underlying record; each mutation produces
/// a fresh event with a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Stable identifier of the point of interest.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Optional free-form description.
    pub description: Option<String>,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Whether the POI is currently visible to clients.
    pub active: bool,

    /// Number of likes at snapshot time.
    pub like_count: u64,

    /// Number of recorded views at snapshot time.
    pub view_count: u64,

    /// Time of the mutation that produced this snapshot.
    pub updated_at: DateTime<Utc>,
}

impl Poi {
    /// Create a minimal active snapshot with zeroed counters.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            latitude,
            longitude,
            active: true,
            like_count: 0,
            view_count: 0,
            updated_at: Utc::now(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the active flag.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
