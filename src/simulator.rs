//! Live route replay.
//!
//! Walks a finalized route's coordinate sequence on a background thread,
//! publishing one progress snapshot per coordinate to the notification
//! channel, keyed by the driver/route identifier. Publishing is best effort:
//! failures are logged and the replay continues. The task ends when the
//! coordinates are exhausted or the cancel token fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::feature::RouteFeature;
use crate::traits::ProgressPublisher;
use crate::types::Destination;

/// Replay pacing. The delay between emissions is drawn uniformly from
/// [min_delay, max_delay] per step.
#[derive(Debug, Clone, Copy)]
pub struct SimulatorConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// Cooperative stop signal for an in-flight replay.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// The simulator's own copy of what it needs from a finalized route. No
/// state is shared with the request path that produced the feature.
#[derive(Debug, Clone)]
pub struct ReplayRoute {
    pub coordinates: Vec<[f64; 2]>,
    pub destinations: Vec<Destination>,
    pub total_distance: f64,
    pub total_duration: f64,
    pub trip_count: usize,
    pub driver_name: String,
    pub vehicle_type: String,
}

impl ReplayRoute {
    pub fn from_feature(feature: &RouteFeature) -> Self {
        Self {
            coordinates: feature.geometry.coordinates.clone(),
            destinations: feature.properties.destinations.clone(),
            total_distance: feature.properties.summary.distance,
            total_duration: feature.properties.summary.duration,
            trip_count: feature.properties.summary.trips,
            driver_name: feature.properties.driver_name.clone(),
            vehicle_type: feature.properties.vehicle_type.clone(),
        }
    }
}

/// One emission of replay progress. Timestamps are unix seconds.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub remaining_routes: Vec<[f64; 2]>,
    pub destinations: Vec<Destination>,
    pub overall_travel_distance: f64,
    pub overall_duration: f64,
    pub total_trips: usize,
    pub assigned_driver: String,
    pub transport_mode: String,
    pub start_time: f64,
    pub overall_estimated_completion_time: f64,
}

pub struct RouteSimulator;

impl RouteSimulator {
    /// Spawns the replay on its own thread and returns its handle. The
    /// caller is not expected to join it; the thread runs to completion or
    /// until the token is cancelled.
    pub fn spawn<P>(
        route: ReplayRoute,
        config: SimulatorConfig,
        publisher: P,
        token: CancelToken,
    ) -> JoinHandle<()>
    where
        P: ProgressPublisher + Send + 'static,
    {
        std::thread::spawn(move || run(route, config, &publisher, &token))
    }
}

fn run<P: ProgressPublisher>(route: ReplayRoute, config: SimulatorConfig, publisher: &P, token: &CancelToken) {
    let pickup_time = unix_now();
    let completion_time = pickup_time + route.total_duration;
    let mut remaining = route.coordinates.clone();
    let mut rng = rand::thread_rng();

    while !remaining.is_empty() && !token.is_cancelled() {
        let snapshot = ProgressSnapshot {
            remaining_routes: remaining.clone(),
            destinations: route.destinations.clone(),
            overall_travel_distance: route.total_distance,
            overall_duration: route.total_duration,
            total_trips: route.trip_count,
            assigned_driver: route.driver_name.clone(),
            transport_mode: route.vehicle_type.clone(),
            start_time: pickup_time,
            overall_estimated_completion_time: completion_time,
        };

        match serde_json::to_value(&snapshot) {
            Ok(payload) => {
                if let Err(err) = publisher.publish(&route.driver_name, &payload) {
                    warn!(driver = %route.driver_name, error = %err, "progress publish failed");
                }
            }
            Err(err) => {
                warn!(driver = %route.driver_name, error = %err, "snapshot serialization failed");
            }
        }

        remaining.remove(0);
        debug!(driver = %route.driver_name, points_left = remaining.len(), "replay step");

        if remaining.is_empty() || token.is_cancelled() {
            break;
        }
        std::thread::sleep(sleep_interval(&mut rng, config));
    }
}

fn sleep_interval<R: Rng>(rng: &mut R, config: SimulatorConfig) -> Duration {
    let min = config.min_delay.as_secs_f64();
    let max = config.max_delay.as_secs_f64().max(min);
    Duration::from_secs_f64(rng.gen_range(min..=max))
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}
