use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use geojson::FeatureCollection;

use acara_core::models::{EventId, OrganizerId};

use crate::dto::{
    EventDetailResponse, EventQueryParams, OrganizerEventResponse, SubmitRequest, SubmitResponse,
};
use crate::error::ApiError;
use crate::services::EventQueryService;
use crate::state::AppState;

/// Public discovery endpoint: verified events filtered by keyword, category,
/// date window, and proximity, as a GeoJSON FeatureCollection.
pub async fn query_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQueryParams>,
) -> Result<Json<FeatureCollection>, ApiError> {
    tracing::info!(
        keyword = ?params.keyword,
        cat = ?params.cat,
        date = ?params.date,
        has_position = params.lat.is_some() && params.lng.is_some(),
        "Processing event query"
    );

    let collection = EventQueryService::execute(&state, params.into()).await?;
    Ok(Json(collection))
}

pub async fn event_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<EventDetailResponse>, ApiError> {
    let detail = state
        .store
        .get_event_detail(EventId(id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Event {} not found", id)))?;

    Ok(Json(detail.into()))
}

pub async fn events_by_organizer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<OrganizerEventResponse>>, ApiError> {
    let records = state.store.list_by_organizer(OrganizerId(id)).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Submit a new event draft. On success the event is persisted together
/// with its initial `waiting` submission row.
pub async fn submit_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let event_id = state.moderation.submit(request.into()).await?;
    Ok((StatusCode::CREATED, Json(SubmitResponse::waiting(event_id.0))))
}

/// Withdraw an event that is still awaiting moderation.
pub async fn withdraw_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.moderation.delete_waiting(EventId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
