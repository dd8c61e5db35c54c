//! Capacitated greedy trip planner.
//!
//! Partitions stops into vehicle trips under a capacity limit and a
//! per-trip round-trip distance limit, working from a pairwise distance
//! matrix. Deliberately myopic: each trip sorts the remaining stops once by
//! distance from the origin and makes a single acceptance pass in that fixed
//! order. Stops skipped in a pass defer to a later trip.

use tracing::debug;

use crate::types::{Trip, VehicleProfile};

/// Plans trips over a distance matrix whose row/column 0 is the origin and
/// whose index `i + 1` is stop i. `demands[i]` is stop i's payload.
///
/// Callers must screen the stops first
/// ([`FeasibilityChecker::screen_stops`](crate::feasibility::FeasibilityChecker::screen_stops)):
/// a stop that is individually infeasible is never accepted by any pass and
/// would otherwise keep the outer loop producing empty trips forever.
///
/// Returned trips hold matrix indices (1..=N) in visiting order; the origin
/// is implicit at both ends of each trip.
pub fn plan_trips(matrix: &[Vec<f64>], demands: &[f64], profile: &VehicleProfile) -> Vec<Trip> {
    let mut unvisited: Vec<usize> = (1..=demands.len()).collect();
    let mut trips = Vec::new();

    while !unvisited.is_empty() {
        let mut trip = Trip {
            stops: Vec::new(),
            load: 0.0,
            planned_distance: 0.0,
        };
        let mut current = 0usize;

        // Snapshot of the remaining stops, nearest-to-origin first. Sorted
        // once per trip; not re-sorted as `current` advances. `unvisited` is
        // kept in ascending index order, so the stable sort breaks distance
        // ties by original index.
        let mut candidates = unvisited.clone();
        candidates.sort_by(|&a, &b| matrix[0][a].total_cmp(&matrix[0][b]));

        for &candidate in &candidates {
            let demand = demands[candidate - 1];
            // Cost if we visit the candidate and then return to the origin
            // from there. The return leg is charged at acceptance time even
            // though it is only realized once the trip ends.
            let extra = matrix[current][candidate] + matrix[candidate][0];
            if trip.load + demand <= profile.capacity
                && trip.planned_distance + extra <= profile.max_trip_distance
            {
                trip.stops.push(candidate);
                trip.load += demand;
                trip.planned_distance += matrix[current][candidate];
                current = candidate;
            }
        }

        if trip.stops.is_empty() {
            // Only reachable when the screening precondition was skipped;
            // bail instead of spinning.
            debug!(remaining = unvisited.len(), "no stop accepted in pass, aborting plan");
            break;
        }

        unvisited.retain(|stop| !trip.stops.contains(stop));
        debug!(
            trip = trips.len(),
            stops = trip.stops.len(),
            load = trip.load,
            planned_distance = trip.planned_distance,
            "trip closed"
        );
        trips.push(trip);
    }

    trips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TravelMode;

    fn profile(capacity: f64, max_dist: f64) -> VehicleProfile {
        VehicleProfile {
            mode: TravelMode::Car,
            capacity,
            max_trip_distance: max_dist,
        }
    }

    #[test]
    fn equal_distances_break_ties_by_index() {
        // Both stops 10m from the origin and from each other.
        let matrix = vec![
            vec![0.0, 10.0, 10.0],
            vec![10.0, 0.0, 10.0],
            vec![10.0, 10.0, 0.0],
        ];
        let trips = plan_trips(&matrix, &[1.0, 1.0], &profile(10.0, 100.0));
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].stops, vec![1, 2]);
    }

    #[test]
    fn skipped_stop_defers_to_next_trip_not_same_pass() {
        // Stop 1 is nearest and accepted; stop 2's demand overflows the
        // remaining capacity, so it lands in a second trip even though the
        // distance budget would have allowed it.
        let matrix = vec![
            vec![0.0, 5.0, 6.0],
            vec![5.0, 0.0, 2.0],
            vec![6.0, 2.0, 0.0],
        ];
        let trips = plan_trips(&matrix, &[4.0, 4.0], &profile(5.0, 100.0));
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].stops, vec![1]);
        assert_eq!(trips[1].stops, vec![2]);
    }

    #[test]
    fn planned_distance_excludes_final_return_leg() {
        let matrix = vec![
            vec![0.0, 5.0, 6.0],
            vec![5.0, 0.0, 2.0],
            vec![6.0, 2.0, 0.0],
        ];
        let trips = plan_trips(&matrix, &[1.0, 1.0], &profile(10.0, 100.0));
        assert_eq!(trips.len(), 1);
        // origin -> 1 (5m) -> 2 (2m); the 6m return is not accumulated.
        assert!((trips[0].planned_distance - 7.0).abs() < 1e-9);
    }

    #[test]
    fn unscreened_infeasible_input_terminates() {
        let matrix = vec![vec![0.0, 10.0], vec![10.0, 0.0]];
        let trips = plan_trips(&matrix, &[99.0], &profile(5.0, 100.0));
        assert!(trips.is_empty());
    }
}
