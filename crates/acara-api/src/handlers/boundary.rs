use std::sync::Arc;

use axum::{extract::State, Json};
use geojson::FeatureCollection;

use crate::services::boundary_feature_collection;
use crate::state::AppState;

/// The province boundary polygon for the map overlay.
pub async fn get_boundary(State(state): State<Arc<AppState>>) -> Json<FeatureCollection> {
    Json(boundary_feature_collection(&state.boundary))
}
