use chrono::{DateTime, Utc};
use serde::Serialize;

use acara_core::models::{EventDetail, EventRecord, SubmittedEvent};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "acara-api" }
    }
}

/// Successful submission response
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub event_id: i64,
    pub status: &'static str,
}

impl SubmitResponse {
    pub fn waiting(event_id: i64) -> Self {
        Self { event_id, status: "waiting" }
    }
}

/// One row of an event's moderation history, newest first.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SubmittedEvent> for HistoryEntry {
    fn from(row: SubmittedEvent) -> Self {
        Self {
            status: row.status.to_string(),
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

/// Flattened event detail with resolved reference names.
#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub content: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub category_name: String,
    pub organizer_name: String,
    pub status: String,
}

impl From<EventDetail> for EventDetailResponse {
    fn from(detail: EventDetail) -> Self {
        let event = detail.event;
        Self {
            id: event.id.0,
            name: event.name,
            description: event.description,
            content: event.content,
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location,
            lat: event.position.lat,
            lng: event.position.lng,
            photo: event.photo,
            link: event.link,
            category_name: detail.category_name,
            organizer_name: detail.organizer_name,
            status: detail.status.to_string(),
        }
    }
}

/// Summary row for the organizer dashboard listing.
#[derive(Debug, Serialize)]
pub struct OrganizerEventResponse {
    pub id: i64,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub category_name: String,
    pub status: String,
}

impl From<EventRecord> for OrganizerEventResponse {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.event.id.0,
            name: record.event.name,
            start_date: record.event.start_date,
            end_date: record.event.end_date,
            location: record.event.location,
            category_name: record.category_name,
            status: record.status.to_string(),
        }
    }
}
