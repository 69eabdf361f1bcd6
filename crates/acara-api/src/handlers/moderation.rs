use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use acara_core::models::{EventId, Status};

use crate::dto::{HistoryEntry, TransitionRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// Apply a moderation transition (verify, reject, take down) to an event.
pub async fn transition_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = Status::parse(&request.status).ok_or_else(|| {
        ApiError::bad_request(format!("'{}' is not a moderation status", request.status))
    })?;

    let event_id = EventId(id);
    state.moderation.transition(event_id, status, request.reason).await?;

    Ok(Json(serde_json::json!({
        "event_id": id,
        "status": status.as_str(),
    })))
}

/// Full moderation audit trail for one event, newest first.
pub async fn event_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let history = state.moderation.history(EventId(id)).await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}
