use std::sync::Arc;

use axum::{extract::State, Json};

use acara_core::models::Category;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}
