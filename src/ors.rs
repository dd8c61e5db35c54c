//! OpenRouteService HTTP adapters.
//!
//! `OrsClient` implements both provider seams over the ORS v2 matrix and
//! directions endpoints. `HttpProgressPublisher` posts simulator snapshots
//! to a tracker endpoint. Both hold their own blocking client with a bounded
//! timeout; any non-success status or transport failure surfaces as
//! `PlanError::Upstream` and aborts the operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlanError;
use crate::traits::{DirectionsFeature, DirectionsProvider, DirectionsSummary, DistanceOracle, ProgressPublisher};
use crate::types::Point;

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl OrsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        provider: &'static str,
        url: &str,
        body: &B,
    ) -> Result<R, PlanError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", &self.config.api_key)
            .json(body)
            .send()
            .map_err(|err| PlanError::upstream(provider, "n/a", err))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_else(|err| err.to_string());
            return Err(PlanError::upstream(provider, status.as_u16(), text));
        }

        response
            .json::<R>()
            .map_err(|err| PlanError::upstream(provider, status.as_u16(), err))
    }
}

impl DistanceOracle for OrsClient {
    fn distance_matrix(&self, profile: &str, points: &[Point]) -> Result<Vec<Vec<f64>>, PlanError> {
        let url = format!("{}/v2/matrix/{}", self.config.base_url, profile);
        let body = MatrixRequest {
            locations: points.iter().map(Point::lon_lat).collect(),
            metrics: vec!["distance"],
            units: "m",
        };

        let response: MatrixResponse = self.post_json("ORS matrix", &url, &body)?;
        let matrix = response
            .distances
            .filter(|matrix| !matrix.is_empty())
            .ok_or_else(|| PlanError::upstream("ORS matrix", "200", "returned no distances"))?;

        // A 200 reply is not trusted to be well-formed: anything other than
        // an N×N matrix over the requested points is an upstream error.
        let n = points.len();
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(PlanError::upstream(
                "ORS matrix",
                "200",
                format!("returned a malformed distance matrix for {n} locations"),
            ));
        }
        Ok(matrix)
    }
}

impl DirectionsProvider for OrsClient {
    fn directions(&self, profile: &str, coordinates: &[Point]) -> Result<DirectionsFeature, PlanError> {
        let url = format!("{}/v2/directions/{}/geojson", self.config.base_url, profile);
        let body = DirectionsRequest {
            coordinates: coordinates.iter().map(Point::lon_lat).collect(),
        };

        let response: DirectionsResponse = self.post_json("ORS directions", &url, &body)?;
        let feature = response
            .features
            .into_iter()
            .next()
            .ok_or_else(|| PlanError::upstream("ORS directions", "200", "returned no features"))?;

        Ok(DirectionsFeature {
            coordinates: feature.geometry.coordinates,
            segments: feature.properties.segments,
            summary: feature.properties.summary,
        })
    }
}

#[derive(Debug, Serialize)]
struct MatrixRequest {
    locations: Vec<[f64; 2]>,
    metrics: Vec<&'static str>,
    units: &'static str,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    distances: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Vec<OrsFeature>,
}

#[derive(Debug, Deserialize)]
struct OrsFeature {
    geometry: OrsGeometry,
    properties: OrsProperties,
}

#[derive(Debug, Deserialize)]
struct OrsGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OrsProperties {
    #[serde(default)]
    segments: Vec<Value>,
    summary: DirectionsSummary,
}

/// Posts progress snapshots to a tracker endpoint, keyed by route id.
#[derive(Debug, Clone)]
pub struct HttpProgressPublisher {
    tracker_url: String,
    client: reqwest::blocking::Client,
}

impl HttpProgressPublisher {
    pub fn new(tracker_url: impl Into<String>, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            tracker_url: tracker_url.into(),
            client,
        })
    }
}

impl ProgressPublisher for HttpProgressPublisher {
    fn publish(&self, key: &str, payload: &Value) -> Result<(), PlanError> {
        let mut body = payload.clone();
        if let Value::Object(map) = &mut body {
            map.insert("route_id".to_string(), Value::String(key.to_string()));
        }

        self.client
            .post(&self.tracker_url)
            .json(&body)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| PlanError::upstream("tracker", "n/a", err))?;

        Ok(())
    }
}
