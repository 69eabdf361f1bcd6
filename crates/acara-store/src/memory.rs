//! In-memory storage implementation for development and testing.
//!
//! All tables live behind one `RwLock`, so the dual writes the port requires
//! to be atomic (event + initial submission row, event deletion + its rows)
//! happen under a single write guard and no partial state is ever visible.
//!
//! `RwLock::unwrap()` is intentional here: lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an unrecoverable
//! state. For production workloads, use the PostgreSQL backend.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use acara_core::error::{AcaraError, Result};
use acara_core::models::{
    Category, CategoryId, Event, EventDetail, EventId, EventRecord, NewEvent, Organizer,
    OrganizerId, Status, SubmissionId, SubmittedEvent,
};
use acara_core::ports::EventStore;

#[derive(Debug, Default)]
struct State {
    events: HashMap<EventId, Event>,
    /// Append-only moderation log, ids strictly increasing.
    submissions: Vec<SubmittedEvent>,
    categories: HashMap<CategoryId, Category>,
    organizers: HashMap<OrganizerId, Organizer>,
    next_event_id: i64,
    next_submission_id: i64,
    next_category_id: i64,
    next_organizer_id: i64,
}

/// In-memory implementation of [`EventStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    state: Arc<RwLock<State>>,
}

impl MemoryEventStore {
    /// Create a new in-memory event store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category (reference data normally loaded by migration).
    pub fn seed_category(&self, name: &str) -> Category {
        let mut state = self.state.write().unwrap();
        state.next_category_id += 1;
        let category = Category { id: CategoryId(state.next_category_id), name: name.to_string() };
        state.categories.insert(category.id, category.clone());
        category
    }

    /// Seed an organizer account.
    pub fn seed_organizer(&self, name: &str, email: &str) -> Organizer {
        let mut state = self.state.write().unwrap();
        state.next_organizer_id += 1;
        let organizer = Organizer {
            id: OrganizerId(state.next_organizer_id),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            address: None,
        };
        state.organizers.insert(organizer.id, organizer.clone());
        organizer
    }

    /// Number of events currently stored. Used by tests to assert that
    /// failed submissions leave persistence untouched.
    pub fn event_count(&self) -> usize {
        self.state.read().unwrap().events.len()
    }

    /// Number of submission rows across all events.
    pub fn submission_count(&self) -> usize {
        self.state.read().unwrap().submissions.len()
    }
}

fn latest_status(state: &State, event_id: EventId) -> Option<Status> {
    state
        .submissions
        .iter()
        .filter(|s| s.event_id == event_id)
        .max_by_key(|s| s.id)
        .map(|s| s.status)
}

fn push_submission(
    state: &mut State,
    event_id: EventId,
    status: Status,
    reason: Option<String>,
) -> SubmissionId {
    state.next_submission_id += 1;
    let id = SubmissionId(state.next_submission_id);
    state.submissions.push(SubmittedEvent {
        id,
        event_id,
        status,
        reason,
        created_at: Utc::now(),
    });
    id
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create_event(&self, event: &NewEvent) -> Result<EventId> {
        let mut state = self.state.write().unwrap();

        // Referential checks the database enforces with foreign keys.
        if !state.categories.contains_key(&event.category_id) {
            return Err(AcaraError::Persistence(format!(
                "category {} does not exist",
                event.category_id.0
            )));
        }
        if !state.organizers.contains_key(&event.organizer_id) {
            return Err(AcaraError::Persistence(format!(
                "organizer {} does not exist",
                event.organizer_id.0
            )));
        }

        state.next_event_id += 1;
        let id = EventId(state.next_event_id);

        // Event and initial waiting row are inserted under the same write
        // guard, so either both exist or neither does.
        state.events.insert(
            id,
            Event {
                id,
                name: event.name.clone(),
                description: event.description.clone(),
                content: event.content.clone(),
                start_date: event.start_date,
                end_date: event.end_date,
                location: event.location.clone(),
                position: event.position,
                photo: event.photo.clone(),
                link: event.link.clone(),
                popular_place_id: event.popular_place_id,
                organizer_id: event.organizer_id,
                category_id: event.category_id,
                created_at: Utc::now(),
            },
        );
        push_submission(&mut state, id, Status::Waiting, None);

        Ok(id)
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>> {
        let state = self.state.read().unwrap();
        Ok(state.events.get(&id).cloned())
    }

    async fn get_event_detail(&self, id: EventId) -> Result<Option<EventDetail>> {
        let state = self.state.read().unwrap();
        let Some(event) = state.events.get(&id) else {
            return Ok(None);
        };
        let category_name = state
            .categories
            .get(&event.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let organizer_name = state
            .organizers
            .get(&event.organizer_id)
            .map(|o| o.name.clone())
            .unwrap_or_default();
        let status = latest_status(&state, id).unwrap_or(Status::Waiting);

        Ok(Some(EventDetail { event: event.clone(), category_name, organizer_name, status }))
    }

    async fn list_verified(&self) -> Result<Vec<EventRecord>> {
        let state = self.state.read().unwrap();
        let mut records: Vec<EventRecord> = state
            .events
            .values()
            .filter(|e| latest_status(&state, e.id) == Some(Status::Verified))
            .map(|e| EventRecord {
                event: e.clone(),
                category_name: state
                    .categories
                    .get(&e.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                status: Status::Verified,
            })
            .collect();
        records.sort_by_key(|r| r.event.id);
        Ok(records)
    }

    async fn list_by_organizer(&self, organizer_id: OrganizerId) -> Result<Vec<EventRecord>> {
        let state = self.state.read().unwrap();
        let mut records: Vec<EventRecord> = state
            .events
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .map(|e| EventRecord {
                event: e.clone(),
                category_name: state
                    .categories
                    .get(&e.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                status: latest_status(&state, e.id).unwrap_or(Status::Waiting),
            })
            .collect();
        records.sort_by_key(|r| r.event.id);
        Ok(records)
    }

    async fn append_submission(
        &self,
        event_id: EventId,
        status: Status,
        reason: Option<String>,
    ) -> Result<SubmissionId> {
        let mut state = self.state.write().unwrap();
        if !state.events.contains_key(&event_id) {
            return Err(AcaraError::NotFound { event_id });
        }
        Ok(push_submission(&mut state, event_id, status, reason))
    }

    async fn current_status(&self, event_id: EventId) -> Result<Option<Status>> {
        let state = self.state.read().unwrap();
        Ok(latest_status(&state, event_id))
    }

    async fn submission_history(&self, event_id: EventId) -> Result<Vec<SubmittedEvent>> {
        let state = self.state.read().unwrap();
        let mut history: Vec<SubmittedEvent> =
            state.submissions.iter().filter(|s| s.event_id == event_id).cloned().collect();
        history.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(history)
    }

    async fn delete_event(&self, event_id: EventId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.events.remove(&event_id).is_none() {
            return Err(AcaraError::NotFound { event_id });
        }
        state.submissions.retain(|s| s.event_id != event_id);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.read().unwrap();
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by_key(|c| c.id.0);
        Ok(categories)
    }
}
