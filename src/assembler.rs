//! Route assembly: orchestrates the distance oracle, the trip planner and
//! the directions provider into one combined route feature.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::PlanError;
use crate::feasibility::FeasibilityChecker;
use crate::feature::{bounding_box, RouteFeature, RouteProperties, RouteSummary};
use crate::planner::plan_trips;
use crate::traits::{DirectionsFeature, DirectionsProvider, DistanceOracle};
use crate::types::{Point, RouteRequest, Trip};

const ENGINE_DIRECT: &str = "ors:direct";
const ENGINE_TRIP_PLANNER: &str = "ors:trip-planner";

/// Builds one combined route feature per routing request.
///
/// A single destination takes a shortcut (one directions call, validated
/// post-hoc); multiple destinations go through the distance matrix, the
/// per-stop feasibility screen and the greedy trip planner, with one
/// directions call per planned trip.
pub struct RouteAssembler<O, D> {
    oracle: O,
    directions: D,
}

impl<O, D> RouteAssembler<O, D>
where
    O: DistanceOracle,
    D: DirectionsProvider + Sync,
{
    pub fn new(oracle: O, directions: D) -> Self {
        Self { oracle, directions }
    }

    pub fn assemble(&self, request: &RouteRequest) -> Result<RouteFeature, PlanError> {
        validate(request)?;

        let profile = request.driver_details.vehicle_profile();
        let checker = FeasibilityChecker::new(profile);
        let ors_profile = profile.mode.ors_profile();

        let feature = if request.destination_points.len() == 1 {
            self.assemble_single(request, &checker, ors_profile)?
        } else {
            self.assemble_multi(request, &checker, ors_profile)?
        };

        info!(
            driver = %request.driver_details.driver_name,
            trips = feature.properties.summary.trips,
            distance = feature.properties.summary.distance,
            engine = %feature.properties.engine,
            "route assembled"
        );
        Ok(feature)
    }

    /// N = 1: skip the matrix and the planner entirely; one directions call
    /// over [origin, stop], validated against the vehicle limits afterward.
    fn assemble_single(
        &self,
        request: &RouteRequest,
        checker: &FeasibilityChecker,
        ors_profile: &str,
    ) -> Result<RouteFeature, PlanError> {
        let destination = request.destination_points[0];
        let coordinates = [request.source_point, destination.point()];
        let leg = self.directions.directions(ors_profile, &coordinates)?;

        let violations = checker.check(destination.payload, leg.summary.distance);
        if !violations.is_empty() {
            return Err(PlanError::Feasibility(violations));
        }

        Ok(RouteFeature::new(
            bounding_box(&leg.coordinates),
            leg.coordinates.clone(),
            RouteProperties {
                source: request.source_point,
                destinations: request.destination_points.clone(),
                optimized_order: vec![0],
                segments: leg.segments,
                summary: RouteSummary {
                    distance: leg.summary.distance,
                    duration: leg.summary.duration,
                    trips: 1,
                },
                vehicle_type: request.driver_details.vehicle_type.clone(),
                driver_name: request.driver_details.driver_name.clone(),
                engine: ENGINE_DIRECT.to_string(),
            },
        ))
    }

    /// N > 1: one matrix call over [origin] + stops, the per-stop screen,
    /// the greedy planner, then one directions call per trip, stitched back
    /// together in trip order.
    fn assemble_multi(
        &self,
        request: &RouteRequest,
        checker: &FeasibilityChecker,
        ors_profile: &str,
    ) -> Result<RouteFeature, PlanError> {
        let stops = request.stops();
        let mut points = Vec::with_capacity(stops.len() + 1);
        points.push(request.source_point);
        points.extend(stops.iter().map(|stop| stop.point));

        let matrix = self.oracle.distance_matrix(ors_profile, &points)?;
        check_matrix_shape(&matrix, points.len())?;
        let demands: Vec<f64> = stops.iter().map(|stop| stop.demand).collect();
        checker.screen_stops(&matrix, &demands)?;

        let profile = request.driver_details.vehicle_profile();
        let trips = plan_trips(&matrix, &demands, &profile);
        debug!(trips = trips.len(), stops = stops.len(), "plan complete");

        // One directions call per trip. The calls are independent; rayon
        // collects them back in trip order, so the stitched output matches a
        // sequential pass. Only the directions provider crosses into the
        // worker threads.
        let directions = &self.directions;
        let legs: Vec<DirectionsFeature> = trips
            .par_iter()
            .map(|trip| {
                let coords = trip_coordinates(&points, trip);
                directions.directions(ors_profile, &coords)
            })
            .collect::<Result<_, _>>()?;

        // Concatenate in trip order. The origin coordinate repeats at trip
        // boundaries; it is carried through as-is.
        let mut coordinates = Vec::new();
        let mut segments = Vec::new();
        let mut distance = 0.0;
        let mut duration = 0.0;
        for leg in legs {
            coordinates.extend(leg.coordinates);
            segments.extend(leg.segments);
            distance += leg.summary.distance;
            duration += leg.summary.duration;
        }

        // Matrix index i maps back to destination i - 1 (row 0 is the
        // origin), giving the visiting order trip by trip.
        let optimized_order: Vec<usize> = trips
            .iter()
            .flat_map(|trip| trip.stops.iter().map(|&idx| idx - 1))
            .collect();

        Ok(RouteFeature::new(
            bounding_box(&coordinates),
            coordinates.clone(),
            RouteProperties {
                source: request.source_point,
                destinations: request.destination_points.clone(),
                optimized_order,
                segments,
                summary: RouteSummary {
                    distance,
                    duration,
                    trips: trips.len(),
                },
                vehicle_type: request.driver_details.vehicle_type.clone(),
                driver_name: request.driver_details.driver_name.clone(),
                engine: ENGINE_TRIP_PLANNER.to_string(),
            },
        ))
    }
}

/// Coordinate sequence for one trip: origin, stops in visiting order,
/// origin again.
fn trip_coordinates(points: &[Point], trip: &Trip) -> Vec<Point> {
    let mut coords = Vec::with_capacity(trip.stops.len() + 2);
    coords.push(points[0]);
    coords.extend(trip.stops.iter().map(|&idx| points[idx]));
    coords.push(points[0]);
    coords
}

/// A successful matrix response can still be malformed; anything other than
/// an N×N matrix over the requested points would panic the screen and the
/// planner, so it is rejected as an upstream error instead.
fn check_matrix_shape(matrix: &[Vec<f64>], expected: usize) -> Result<(), PlanError> {
    if matrix.len() != expected || matrix.iter().any(|row| row.len() != expected) {
        return Err(PlanError::upstream(
            "ORS matrix",
            "200",
            format!(
                "malformed distance matrix: expected {expected}x{expected} for {expected} locations"
            ),
        ));
    }
    Ok(())
}

fn validate(request: &RouteRequest) -> Result<(), PlanError> {
    if request.destination_points.is_empty() {
        return Err(PlanError::Validation("no destination points specified.".to_string()));
    }
    if request.destination_points.iter().any(|dest| dest.payload < 0.0) {
        return Err(PlanError::Validation("destination payload must be non-negative".to_string()));
    }
    Ok(())
}
