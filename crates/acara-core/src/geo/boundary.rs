//! Province boundary geometry and containment checks.
//!
//! The boundary is immutable reference data: it is parsed once from a
//! GeoJSON file at startup and shared read-only for the lifetime of the
//! process.

use ::geo::algorithm::intersects::Intersects;
use ::geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use geojson::{GeoJson, Value};
use std::fs;
use std::path::Path;

use crate::error::{AcaraError, Result};
use crate::models::GeoPoint;

/// A named administrative boundary (one or more polygons with holes).
#[derive(Debug, Clone)]
pub struct Boundary {
    name: String,
    polygons: MultiPolygon,
}

impl Boundary {
    /// Build a boundary from raw polygon rings (outer ring first, holes after),
    /// each vertex as `[lng, lat]` per GeoJSON convention.
    pub fn from_rings(name: impl Into<String>, rings: Vec<Vec<[f64; 2]>>) -> Result<Self> {
        let polygon = polygon_from_rings(&rings)?;
        Ok(Self { name: name.into(), polygons: MultiPolygon::new(vec![polygon]) })
    }

    /// Parse a boundary from GeoJSON text. Accepts a bare Polygon or
    /// MultiPolygon geometry, or a Feature/FeatureCollection wrapping one.
    pub fn from_geojson_str(name: impl Into<String>, raw: &str) -> Result<Self> {
        let geojson: GeoJson = raw.parse().map_err(|e| AcaraError::BoundaryInvalid {
            reason: format!("not valid GeoJSON: {}", e),
        })?;

        let value = match geojson {
            GeoJson::Geometry(g) => g.value,
            GeoJson::Feature(f) => {
                f.geometry
                    .ok_or_else(|| AcaraError::BoundaryInvalid {
                        reason: "feature has no geometry".to_string(),
                    })?
                    .value
            }
            GeoJson::FeatureCollection(fc) => {
                fc.features
                    .into_iter()
                    .find_map(|f| f.geometry)
                    .ok_or_else(|| AcaraError::BoundaryInvalid {
                        reason: "feature collection has no geometry".to_string(),
                    })?
                    .value
            }
        };

        let polygons = match value {
            Value::Polygon(rings) => {
                MultiPolygon::new(vec![polygon_from_geojson_rings(&rings)?])
            }
            Value::MultiPolygon(polys) => {
                let polygons = polys
                    .iter()
                    .map(|rings| polygon_from_geojson_rings(rings))
                    .collect::<Result<Vec<_>>>()?;
                MultiPolygon::new(polygons)
            }
            other => {
                return Err(AcaraError::BoundaryInvalid {
                    reason: format!("expected Polygon or MultiPolygon, got {}", other.type_name()),
                })
            }
        };

        Ok(Self { name: name.into(), polygons })
    }

    /// Load a boundary from a GeoJSON file on disk.
    pub fn load(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_geojson_str(name, &raw)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Containment check: true when the point lies inside the boundary.
    ///
    /// A point exactly on an edge counts as inside; points inside a hole do
    /// not (holes subtract from containment).
    pub fn contains(&self, point: GeoPoint) -> bool {
        let p: Point = point.into();
        self.polygons.intersects(&p)
    }

    /// The boundary as GeoJSON polygon rings, `[lng, lat]` vertices.
    pub fn to_geojson_value(&self) -> Value {
        let polys = self
            .polygons
            .iter()
            .map(|poly| {
                let mut rings = Vec::new();
                rings.push(ring_positions(poly.exterior()));
                for interior in poly.interiors() {
                    rings.push(ring_positions(interior));
                }
                rings
            })
            .collect::<Vec<_>>();

        if polys.len() == 1 {
            Value::Polygon(polys.into_iter().next().unwrap())
        } else {
            Value::MultiPolygon(polys)
        }
    }
}

fn ring_positions(ring: &LineString) -> Vec<Vec<f64>> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn polygon_from_geojson_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon> {
    let rings: Vec<Vec<[f64; 2]>> = rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|pos| {
                    if pos.len() < 2 {
                        return Err(AcaraError::BoundaryInvalid {
                            reason: "position with fewer than two coordinates".to_string(),
                        });
                    }
                    Ok([pos[0], pos[1]])
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    polygon_from_rings(&rings)
}

fn polygon_from_rings(rings: &[Vec<[f64; 2]>]) -> Result<Polygon> {
    let mut line_strings = rings.iter().map(|ring| {
        LineString::new(ring.iter().map(|c| Coord { x: c[0], y: c[1] }).collect())
    });

    let exterior = line_strings.next().ok_or_else(|| AcaraError::BoundaryInvalid {
        reason: "polygon has no rings".to_string(),
    })?;
    if exterior.0.len() < 4 {
        return Err(AcaraError::BoundaryInvalid {
            reason: "outer ring needs at least four vertices".to_string(),
        });
    }

    Ok(Polygon::new(exterior, line_strings.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Boundary {
        // Rings are [lng, lat]; a 10x10 degree square anchored at the origin.
        Boundary::from_rings(
            "square",
            vec![vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]],
        )
        .unwrap()
    }

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn point_inside_square() {
        assert!(square().contains(point(5.0, 5.0)));
    }

    #[test]
    fn point_outside_square() {
        assert!(!square().contains(point(15.0, 15.0)));
    }

    #[test]
    fn point_on_edge_counts_as_inside() {
        // Edge policy: the boundary itself belongs to the region.
        assert!(square().contains(point(5.0, 0.0)));
        assert!(square().contains(point(0.0, 5.0)));
        assert!(square().contains(point(0.0, 0.0)));
    }

    #[test]
    fn holes_subtract_from_containment() {
        let with_hole = Boundary::from_rings(
            "square-with-hole",
            vec![
                vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]],
            ],
        )
        .unwrap();

        assert!(!with_hole.contains(point(5.0, 5.0)), "inside the hole");
        assert!(with_hole.contains(point(2.0, 2.0)), "between hole and outer ring");
        assert!(with_hole.contains(point(5.0, 4.0)), "on the hole edge");
    }

    #[test]
    fn parses_feature_collection() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"region": "test"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
                }
            }]
        }"#;

        let boundary = Boundary::from_geojson_str("test", raw).unwrap();
        assert!(boundary.contains(point(5.0, 5.0)));
        assert!(!boundary.contains(point(-1.0, 5.0)));
    }

    #[test]
    fn rejects_non_polygon_geometry() {
        let raw = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        let err = Boundary::from_geojson_str("test", raw).unwrap_err();
        assert!(matches!(err, AcaraError::BoundaryInvalid { .. }));
    }
}
