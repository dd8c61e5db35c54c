//! Trip planner tests
//!
//! Covers the greedy acceptance semantics, the plan-wide invariants and the
//! pre-flight feasibility screen over hand-built distance matrices.

use trip_planner::error::{PlanError, Violation};
use trip_planner::feasibility::FeasibilityChecker;
use trip_planner::planner::plan_trips;
use trip_planner::types::{TravelMode, Trip, VehicleProfile};

fn profile(capacity: f64, max_trip_distance: f64) -> VehicleProfile {
    VehicleProfile {
        mode: TravelMode::Car,
        capacity,
        max_trip_distance,
    }
}

/// Origin at index 0, stop X at 1 (10m out), stop Y at 2 (12m out), 5m
/// between the stops.
fn two_stop_matrix() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 10.0, 12.0],
        vec![10.0, 0.0, 5.0],
        vec![12.0, 5.0, 0.0],
    ]
}

fn all_stops(trips: &[Trip]) -> Vec<usize> {
    let mut stops: Vec<usize> = trips.iter().flat_map(|t| t.stops.iter().copied()).collect();
    stops.sort_unstable();
    stops
}

#[test]
fn capacity_overflow_splits_into_two_trips() {
    // Scenario: demands 4 + 4 against capacity 5. Each stop fits alone but
    // not together, so the second stop defers to a second trip.
    let trips = plan_trips(&two_stop_matrix(), &[4.0, 4.0], &profile(5.0, 50.0));

    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].stops, vec![1]);
    assert_eq!(trips[1].stops, vec![2]);
}

#[test]
fn roomy_capacity_yields_single_trip_nearest_first() {
    let trips = plan_trips(&two_stop_matrix(), &[4.0, 4.0], &profile(10.0, 50.0));

    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].stops, vec![1, 2]);
    assert!((trips[0].load - 8.0).abs() < 1e-9);
    // origin -> 1 (10m) -> 2 (5m); return leg not accumulated.
    assert!((trips[0].planned_distance - 15.0).abs() < 1e-9);
}

#[test]
fn every_stop_lands_in_exactly_one_trip() {
    // 6 stops in a line, demands forcing several trips.
    let n = 6;
    let mut matrix = vec![vec![0.0; n + 1]; n + 1];
    for i in 0..=n {
        for j in 0..=n {
            matrix[i][j] = (i as f64 - j as f64).abs() * 10.0;
        }
    }
    let demands = vec![3.0, 2.0, 4.0, 1.0, 5.0, 2.0];

    let trips = plan_trips(&matrix, &demands, &profile(6.0, 1000.0));

    assert_eq!(all_stops(&trips), (1..=n).collect::<Vec<_>>());
    for trip in &trips {
        let load: f64 = trip.stops.iter().map(|&s| demands[s - 1]).sum();
        assert!(load <= 6.0, "trip load {load} exceeds capacity");
    }
}

#[test]
fn round_trip_distance_limit_is_honored_per_trip() {
    // Two clusters on opposite sides of the origin: 1 and 2 nearby, 3 and 4
    // far out. Crossing between clusters blows the budget, so the plan
    // splits into one trip per cluster.
    let matrix = vec![
        vec![0.0, 10.0, 11.0, 35.0, 36.0],
        vec![10.0, 0.0, 1.0, 45.0, 46.0],
        vec![11.0, 1.0, 0.0, 45.0, 46.0],
        vec![35.0, 45.0, 45.0, 0.0, 1.0],
        vec![36.0, 46.0, 46.0, 1.0, 0.0],
    ];
    let vehicle = profile(100.0, 80.0);
    let trips = plan_trips(&matrix, &[1.0, 1.0, 1.0, 1.0], &vehicle);

    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].stops, vec![1, 2]);
    assert_eq!(trips[1].stops, vec![3, 4]);
    assert_eq!(all_stops(&trips), vec![1, 2, 3, 4]);
    for trip in &trips {
        let mut dist = 0.0;
        let mut current = 0usize;
        for &stop in &trip.stops {
            dist += matrix[current][stop];
            current = stop;
        }
        dist += matrix[current][0];
        assert!(
            dist <= vehicle.max_trip_distance + 1e-9,
            "trip {:?} travels {dist}m against limit {}",
            trip.stops,
            vehicle.max_trip_distance
        );
    }
}

#[test]
fn candidate_order_is_fixed_at_trip_start() {
    // Stop 2 is nearest the origin but stop 3 becomes nearest once the
    // vehicle is at stop 2. The pass still follows the origin-distance
    // order taken at trip start, so acceptance order is 2, 1, 3.
    let matrix = vec![
        vec![0.0, 20.0, 10.0, 30.0],
        vec![20.0, 0.0, 50.0, 60.0],
        vec![10.0, 50.0, 0.0, 1.0],
        vec![30.0, 60.0, 1.0, 0.0],
    ];
    let trips = plan_trips(&matrix, &[1.0, 1.0, 1.0], &profile(10.0, 1000.0));

    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].stops, vec![2, 1, 3]);
}

#[test]
fn screen_rejects_unservable_stop_before_planning() {
    // Scenario: demand 10 against capacity 5 can never be served; the
    // screen reports it instead of letting the planner spin.
    let matrix = vec![vec![0.0, 10.0], vec![10.0, 0.0]];
    let checker = FeasibilityChecker::new(profile(5.0, 50.0));

    let err = checker.screen_stops(&matrix, &[10.0]).unwrap_err();
    match err {
        PlanError::UnreachableStop(stops) => {
            assert_eq!(stops.len(), 1);
            assert_eq!(stops[0].stop_index, 0);
            assert_eq!(stops[0].violations, vec![Violation::PayloadExceedsCapacity]);
        }
        other => panic!("expected UnreachableStop, got {other:?}"),
    }
}

#[test]
fn screened_plans_always_terminate_with_full_coverage() {
    // Mixed demands near the capacity limit; after screening, the planner
    // must place every stop.
    let n = 5;
    let mut matrix = vec![vec![0.0; n + 1]; n + 1];
    for i in 0..=n {
        for j in 0..=n {
            matrix[i][j] = ((i * 7 + j * 13) % 17) as f64 + if i == j { 0.0 } else { 3.0 };
        }
    }
    for i in 0..=n {
        matrix[i][i] = 0.0;
    }
    let demands = vec![5.0, 5.0, 5.0, 5.0, 5.0];
    let vehicle = profile(5.0, 1000.0);

    let checker = FeasibilityChecker::new(vehicle);
    checker.screen_stops(&matrix, &demands).unwrap();

    let trips = plan_trips(&matrix, &demands, &vehicle);
    assert_eq!(all_stops(&trips), (1..=n).collect::<Vec<_>>());
    // Capacity equals each demand, so every stop rides alone.
    assert_eq!(trips.len(), n);
}
