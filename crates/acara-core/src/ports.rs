//! Storage port the workflow and query paths drive.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Category, Event, EventDetail, EventId, EventRecord, NewEvent, OrganizerId, Status,
    SubmissionId, SubmittedEvent,
};

/// Port for event persistence.
///
/// Implementations must make the multi-row writes atomic: a failure leaves
/// neither an orphan event without a status row nor a status row without an
/// event.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event together with its initial `waiting` submission
    /// row, as a single unit.
    async fn create_event(&self, event: &NewEvent) -> Result<EventId>;

    /// Retrieve an event by id.
    async fn get_event(&self, id: EventId) -> Result<Option<Event>>;

    /// Retrieve an event with its category and organizer names resolved.
    async fn get_event_detail(&self, id: EventId) -> Result<Option<EventDetail>>;

    /// All events whose current status is `verified`, joined with their
    /// category names, ordered by event id.
    async fn list_verified(&self) -> Result<Vec<EventRecord>>;

    /// All events belonging to one organizer, any status.
    async fn list_by_organizer(&self, organizer_id: OrganizerId) -> Result<Vec<EventRecord>>;

    /// Append a new submission row. Never mutates prior rows.
    async fn append_submission(
        &self,
        event_id: EventId,
        status: Status,
        reason: Option<String>,
    ) -> Result<SubmissionId>;

    /// Status of the most recent submission row, or None when the event has
    /// no rows.
    async fn current_status(&self, event_id: EventId) -> Result<Option<Status>>;

    /// Full audit trail for an event, newest first.
    async fn submission_history(&self, event_id: EventId) -> Result<Vec<SubmittedEvent>>;

    /// Delete an event and all of its submission rows, as a single unit.
    async fn delete_event(&self, event_id: EventId) -> Result<()>;

    /// Immutable category reference data.
    async fn list_categories(&self) -> Result<Vec<Category>>;
}
