use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::GeoPoint;
use super::submission::Status;

/// Unique identifier for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

/// Unique identifier for an organizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizerId(pub i64);

/// Unique identifier for a popular place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceId(pub i64);

/// A persisted event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    /// Rich-text body rendered on the detail page
    pub content: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Free-text venue label
    pub location: String,
    pub position: GeoPoint,
    pub photo: Option<String>,
    /// Route link derived from the coordinates at submission time
    pub link: Option<String>,
    pub popular_place_id: Option<PlaceId>,
    pub organizer_id: OrganizerId,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

/// An unvalidated submission draft as received at the boundary.
///
/// All fields the workflow validates are optional here; `ModerationService`
/// turns a draft into a [`NewEvent`] or rejects it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub photo: Option<String>,
    pub popular_place_id: Option<PlaceId>,
    pub organizer_id: Option<OrganizerId>,
    pub category_id: Option<CategoryId>,
}

/// A fully-validated event ready to be persisted.
///
/// Only the moderation workflow constructs these, so a `NewEvent` reaching
/// the store has already passed field validation and the containment check.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub content: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub position: GeoPoint,
    pub photo: Option<String>,
    pub link: Option<String>,
    pub popular_place_id: Option<PlaceId>,
    pub organizer_id: OrganizerId,
    pub category_id: CategoryId,
}

/// Immutable reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organizer {
    pub id: OrganizerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// An event joined with its category name and current moderation status,
/// the shape the filter evaluates.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub event: Event,
    pub category_name: String,
    pub status: Status,
}

/// Detail view of an event with resolved reference names.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub event: Event,
    pub category_name: String,
    pub organizer_name: String,
    pub status: Status,
}
