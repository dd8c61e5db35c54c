//! Provider seams for the routing pipeline.
//!
//! These are intentionally minimal. Concrete adapters (the ORS HTTP client,
//! an HTTP tracker publisher) live in their own modules; tests supply mock
//! implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlanError;
use crate::types::Point;

/// Provides a pairwise travel-distance matrix for an ordered point list.
///
/// The matrix is indexed by the provided point order: `matrix[i][j]` is the
/// directed distance in meters from point i to point j. Not assumed
/// symmetric. Any failure aborts planning; no partial matrix is used.
pub trait DistanceOracle {
    fn distance_matrix(&self, profile: &str, points: &[Point]) -> Result<Vec<Vec<f64>>, PlanError>;
}

/// Returns geometry, per-leg segments and a distance/duration summary for
/// one exact coordinate sequence.
pub trait DirectionsProvider {
    fn directions(&self, profile: &str, coordinates: &[Point]) -> Result<DirectionsFeature, PlanError>;
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for &T {
    fn distance_matrix(&self, profile: &str, points: &[Point]) -> Result<Vec<Vec<f64>>, PlanError> {
        (**self).distance_matrix(profile, points)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn directions(&self, profile: &str, coordinates: &[Point]) -> Result<DirectionsFeature, PlanError> {
        (**self).directions(profile, coordinates)
    }
}

/// Fire-and-forget notification channel used by the route simulator.
/// Delivery is best effort; the core never awaits an acknowledgement.
pub trait ProgressPublisher {
    fn publish(&self, key: &str, payload: &Value) -> Result<(), PlanError>;
}

/// A directions result for a single coordinate sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsFeature {
    /// Route geometry in GeoJSON coordinate order: [lon, lat].
    pub coordinates: Vec<[f64; 2]>,
    /// Opaque per-leg segment objects, passed through to the response.
    pub segments: Vec<Value>,
    pub summary: DirectionsSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionsSummary {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}
