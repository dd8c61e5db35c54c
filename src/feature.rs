//! GeoJSON route feature returned to callers.
//!
//! One combined feature per routing request: concatenated LineString
//! geometry, per-leg segments in trip order, and summary/ordering metadata
//! for display and persistence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Destination, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteFeature {
    #[serde(rename = "type")]
    pub feature_type: String,
    /// [minLon, minLat, maxLon, maxLat] over the combined geometry.
    pub bbox: [f64; 4],
    pub geometry: LineString,
    pub properties: RouteProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub geometry_type: String,
    /// GeoJSON coordinate order: [lon, lat].
    pub coordinates: Vec<[f64; 2]>,
}

impl LineString {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            geometry_type: "LineString".to_string(),
            coordinates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProperties {
    pub source: Point,
    pub destinations: Vec<Destination>,
    /// Permutation of destination input positions in visiting order,
    /// trip by trip.
    pub optimized_order: Vec<usize>,
    pub segments: Vec<Value>,
    pub summary: RouteSummary,
    pub vehicle_type: String,
    pub driver_name: String,
    /// Which planning path produced this feature.
    pub engine: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Meters, summed across trips.
    pub distance: f64,
    /// Seconds, summed across trips.
    pub duration: f64,
    /// Number of vehicle trips in the plan.
    pub trips: usize,
}

impl RouteFeature {
    pub fn new(bbox: [f64; 4], coordinates: Vec<[f64; 2]>, properties: RouteProperties) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            bbox,
            geometry: LineString::new(coordinates),
            properties,
        }
    }
}

/// Computes [minLon, minLat, maxLon, maxLat] over a coordinate sequence.
/// Returns an all-zero box for an empty sequence.
pub fn bounding_box(coordinates: &[[f64; 2]]) -> [f64; 4] {
    let mut bbox = match coordinates.first() {
        Some(&[lon, lat]) => [lon, lat, lon, lat],
        None => return [0.0; 4],
    };
    for &[lon, lat] in coordinates {
        bbox[0] = bbox[0].min(lon);
        bbox[1] = bbox[1].min(lat);
        bbox[2] = bbox[2].max(lon);
        bbox[3] = bbox[3].max(lat);
    }
    bbox
}
