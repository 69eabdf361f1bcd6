use chrono::{DateTime, Utc};
use serde::Deserialize;

use acara_core::filter::FilterParams;
use acara_core::models::{CategoryId, EventDraft, OrganizerId, PlaceId};

/// Query-string parameters of the public events endpoint.
///
/// Everything arrives as text; parsing and validation happen in
/// `EventFilter::from_params` so malformed input is rejected in one place.
#[derive(Debug, Default, Deserialize)]
pub struct EventQueryParams {
    pub keyword: Option<String>,
    pub cat: Option<String>,
    pub date: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl From<EventQueryParams> for FilterParams {
    fn from(params: EventQueryParams) -> Self {
        FilterParams {
            keyword: params.keyword,
            cat: params.cat,
            date: params.date,
            lat: params.lat,
            lng: params.lng,
        }
    }
}

/// Body of an event submission.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub photo: Option<String>,
    pub popular_place_id: Option<i64>,
    pub organizer_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl From<SubmitRequest> for EventDraft {
    fn from(req: SubmitRequest) -> Self {
        EventDraft {
            name: req.name,
            description: req.description,
            content: req.content,
            start_date: req.start_date,
            end_date: req.end_date,
            location: req.location,
            lat: req.lat,
            lng: req.lng,
            photo: req.photo,
            popular_place_id: req.popular_place_id.map(PlaceId),
            organizer_id: req.organizer_id.map(OrganizerId),
            category_id: req.category_id.map(CategoryId),
        }
    }
}

/// Body of a moderation transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: String,
    pub reason: Option<String>,
}
