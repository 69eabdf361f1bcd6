use chrono::Utc;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;

use acara_core::filter::{format_start_date, EventFilter, EventHit, FilterParams};
use acara_core::geo::Boundary;

use crate::error::ApiError;
use crate::state::AppState;

/// Service for the public event query endpoint.
pub struct EventQueryService;

impl EventQueryService {
    /// Parse the filter, evaluate it over verified events, and return the
    /// results as a GeoJSON FeatureCollection.
    pub async fn execute(
        state: &AppState,
        params: FilterParams,
    ) -> Result<FeatureCollection, ApiError> {
        let filter = EventFilter::from_params(&params)?.with_radius_km(state.radius_km);

        let candidates = state.store.list_verified().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to load verified events");
            ApiError::from(e)
        })?;

        let hits = filter.evaluate(candidates, Utc::now());
        Ok(to_feature_collection(&hits))
    }
}

/// Convert filter hits into the FeatureCollection the map front end consumes.
pub fn to_feature_collection(hits: &[EventHit]) -> FeatureCollection {
    let features = hits
        .iter()
        .map(|hit| {
            let event = &hit.record.event;

            let mut properties = JsonObject::new();
            properties.insert("id".to_string(), JsonValue::from(event.id.0));
            properties.insert("name".to_string(), JsonValue::from(event.name.clone()));
            properties
                .insert("description".to_string(), JsonValue::from(event.description.clone()));
            properties.insert(
                "start_date".to_string(),
                JsonValue::from(format_start_date(event.start_date)),
            );
            properties.insert("location".to_string(), JsonValue::from(event.location.clone()));
            properties.insert("lat".to_string(), JsonValue::from(event.position.lat));
            properties.insert("lng".to_string(), JsonValue::from(event.position.lng));
            properties.insert("photo".to_string(), JsonValue::from(event.photo.clone()));
            properties.insert(
                "category_name".to_string(),
                JsonValue::from(hit.record.category_name.clone()),
            );
            properties.insert("category_id".to_string(), JsonValue::from(event.category_id.0));
            properties
                .insert("status".to_string(), JsonValue::from(hit.record.status.to_string()));

            if let Some(distance) = hit.distance_km {
                properties.insert("distance".to_string(), JsonValue::from(distance));
            }

            Feature {
                // GeoJSON positions are [lng, lat].
                geometry: Some(Geometry::new(Value::Point(vec![
                    event.position.lng,
                    event.position.lat,
                ]))),
                properties: Some(properties),
                id: None,
                bbox: None,
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection { features, bbox: None, foreign_members: None }
}

/// The province boundary as a single-feature FeatureCollection, the shape
/// the map overlay expects.
pub fn boundary_feature_collection(boundary: &Boundary) -> FeatureCollection {
    let mut properties = JsonObject::new();
    properties.insert("region".to_string(), JsonValue::from(boundary.name().to_string()));

    let feature = Feature {
        geometry: Some(Geometry::new(boundary.to_geojson_value())),
        properties: Some(properties),
        id: None,
        bbox: None,
        foreign_members: None,
    };

    FeatureCollection { features: vec![feature], bbox: None, foreign_members: None }
}
