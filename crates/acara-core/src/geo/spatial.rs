//! Great-circle distance on the WGS84 sphere.

use crate::models::GeoPoint;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers, using the
/// spherical law of cosines with a 6371 km Earth radius.
///
/// This is the same expression the proximity filter has always used, so the
/// 2 km cutoff keeps its meaning:
///
/// `6371 * acos(cos(lat1)*cos(lat2)*cos(lng2 - lng1) + sin(lat1)*sin(lat2))`
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let cos_angle = lat_a.cos() * lat_b.cos() * delta_lng.cos() + lat_a.sin() * lat_b.sin();

    // Identical or near-identical points can push the argument a hair above
    // 1.0 in floating point, which would make acos return NaN.
    EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
}
