//! Moderation workflow: submission validation and the status state machine.
//!
//! An event's moderation history is an append-only log of `SubmittedEvent`
//! rows; the newest row is the current status. The legal transitions are
//!
//! ```text
//! waiting  -> verified | rejected
//! verified -> takedown
//! ```
//!
//! `rejected` and `takedown` are terminal. Taking down an event straight
//! from `waiting` is a policy decision, off by default.

use std::sync::Arc;

use crate::error::{AcaraError, Result};
use crate::geo::Boundary;
use crate::models::{
    EventDraft, EventId, GeoPoint, NewEvent, Status, SubmittedEvent,
};
use crate::ports::EventStore;

/// Workflow knobs that are configuration, not business rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowPolicy {
    /// Allow `waiting -> takedown` without an intermediate verification.
    pub direct_takedown: bool,
}

impl WorkflowPolicy {
    /// Whether `to` is reachable from `from` under this policy.
    pub fn allows(&self, from: Status, to: Status) -> bool {
        match (from, to) {
            (Status::Waiting, Status::Verified) => true,
            (Status::Waiting, Status::Rejected) => true,
            (Status::Verified, Status::Takedown) => true,
            (Status::Waiting, Status::Takedown) => self.direct_takedown,
            _ => false,
        }
    }
}

/// Drives submissions through validation, containment, and status
/// transitions against the storage port.
#[derive(Clone)]
pub struct ModerationService {
    store: Arc<dyn EventStore>,
    boundary: Arc<Boundary>,
    policy: WorkflowPolicy,
}

impl ModerationService {
    pub fn new(store: Arc<dyn EventStore>, boundary: Arc<Boundary>, policy: WorkflowPolicy) -> Self {
        Self { store, boundary, policy }
    }

    /// Validate a draft and persist it with its initial `waiting` row.
    ///
    /// Validation happens entirely before the store is touched, so a
    /// rejected draft leaves persistence unchanged. The event row and the
    /// initial submission row are written as one unit by the store.
    pub async fn submit(&self, draft: EventDraft) -> Result<EventId> {
        let event = self.validate(draft)?;

        // Events tied to a known popular place are inside the province by
        // construction; free coordinates must pass the containment check.
        if event.popular_place_id.is_none() && !self.boundary.contains(event.position) {
            return Err(AcaraError::OutOfBounds {
                lat: event.position.lat,
                lng: event.position.lng,
            });
        }

        let id = self.store.create_event(&event).await?;
        tracing::info!(event_id = %id, name = %event.name, "Event submitted, awaiting moderation");
        Ok(id)
    }

    /// Apply a moderation transition, appending a new audit row.
    pub async fn transition(
        &self,
        event_id: EventId,
        new_status: Status,
        reason: Option<String>,
    ) -> Result<()> {
        let current = self.current_status(event_id).await?;

        if !self.policy.allows(current, new_status) {
            return Err(AcaraError::InvalidTransition { from: current, to: new_status });
        }

        if new_status == Status::Rejected && reason.as_deref().map_or(true, str::is_empty) {
            return Err(AcaraError::Validation {
                field: "reason".to_string(),
                reason: "a rejection requires a reason".to_string(),
            });
        }

        self.store.append_submission(event_id, new_status, reason).await?;
        tracing::info!(event_id = %event_id, status = %new_status, "Moderation status changed");
        Ok(())
    }

    /// Current status of an event: the newest submission row.
    pub async fn current_status(&self, event_id: EventId) -> Result<Status> {
        self.store
            .current_status(event_id)
            .await?
            .ok_or(AcaraError::NotFound { event_id })
    }

    /// Audit trail, newest first.
    pub async fn history(&self, event_id: EventId) -> Result<Vec<SubmittedEvent>> {
        let history = self.store.submission_history(event_id).await?;
        if history.is_empty() {
            return Err(AcaraError::NotFound { event_id });
        }
        Ok(history)
    }

    /// Withdraw an event that is still awaiting moderation.
    ///
    /// Once a moderator has acted on an event its history must survive, so
    /// deletion is only legal while the current status is `waiting`.
    pub async fn delete_waiting(&self, event_id: EventId) -> Result<()> {
        let current = self.current_status(event_id).await?;
        if current != Status::Waiting {
            return Err(AcaraError::InvalidTransition { from: current, to: Status::Waiting });
        }
        self.store.delete_event(event_id).await?;
        tracing::info!(event_id = %event_id, "Waiting event withdrawn");
        Ok(())
    }

    fn validate(&self, draft: EventDraft) -> Result<NewEvent> {
        let name = required_text("name", draft.name)?;
        let description = required_text("description", draft.description)?;
        let category_id = draft.category_id.ok_or_else(|| missing("category_id"))?;
        let organizer_id = draft.organizer_id.ok_or_else(|| missing("organizer_id"))?;
        let start_date = draft.start_date.ok_or_else(|| missing("start_date"))?;
        let end_date = draft.end_date.ok_or_else(|| missing("end_date"))?;
        let lat = draft.lat.ok_or_else(|| missing("lat"))?;
        let lng = draft.lng.ok_or_else(|| missing("lng"))?;

        if end_date < start_date {
            return Err(AcaraError::Validation {
                field: "end_date".to_string(),
                reason: "end date precedes start date".to_string(),
            });
        }

        let position = GeoPoint::new(lat, lng).map_err(|_| AcaraError::Validation {
            field: "location".to_string(),
            reason: format!("({}, {}) is not a valid coordinate", lat, lng),
        })?;

        Ok(NewEvent {
            name,
            description,
            content: draft.content.unwrap_or_default(),
            start_date,
            end_date,
            location: draft.location.unwrap_or_default(),
            position,
            photo: draft.photo,
            link: Some(route_link(position)),
            popular_place_id: draft.popular_place_id,
            organizer_id,
            category_id,
        })
    }
}

/// Directions link shown on the event detail page.
fn route_link(position: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        position.lat, position.lng
    )
}

fn required_text(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(missing(field)),
    }
}

fn missing(field: &str) -> AcaraError {
    AcaraError::Validation {
        field: field.to_string(),
        reason: "required".to_string(),
    }
}
