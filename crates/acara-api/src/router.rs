use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Public discovery
        .route("/api/v1/events", get(handlers::query_events))
        .route("/api/v1/events/{id}", get(handlers::event_detail))
        .route("/api/v1/categories", get(handlers::list_categories))
        .route("/api/v1/boundary", get(handlers::get_boundary))
        // Submission and moderation
        .route("/api/v1/events", post(handlers::submit_event))
        .route("/api/v1/events/{id}", delete(handlers::withdraw_event))
        .route("/api/v1/events/{id}/transition", post(handlers::transition_event))
        .route("/api/v1/events/{id}/history", get(handlers::event_history))
        // Organizer dashboard
        .route("/api/v1/organizers/{id}/events", get(handlers::events_by_organizer))
        .with_state(state)
}
