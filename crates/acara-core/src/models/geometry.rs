use serde::{Deserialize, Serialize};

use crate::error::{AcaraError, Result};

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point, validating coordinate ranges.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AcaraError::InvalidArgument {
                param: "lat".to_string(),
                reason: format!("latitude {} outside [-90, 90]", lat),
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AcaraError::InvalidArgument {
                param: "lng".to_string(),
                reason: format!("longitude {} outside [-180, 180]", lng),
            });
        }
        Ok(Self { lat, lng })
    }
}

impl From<GeoPoint> for geo::Point {
    fn from(p: GeoPoint) -> Self {
        // geo convention: x = longitude, y = latitude
        geo::Point::new(p.lng, p.lat)
    }
}
