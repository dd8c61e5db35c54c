//! Capacity and distance feasibility checks.
//!
//! Stateless predicates evaluated against a finalized trip or a single-stop
//! route, plus the pre-flight screen that rejects stops no trip could ever
//! serve (without it, the greedy planner would loop forever re-producing
//! empty trips for such a stop).

use crate::error::{PlanError, UnreachableStop, Violation};
use crate::types::VehicleProfile;

/// Checks a demand sum and a route distance against vehicle limits.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityChecker {
    profile: VehicleProfile,
}

impl FeasibilityChecker {
    pub fn new(profile: VehicleProfile) -> Self {
        Self { profile }
    }

    /// Returns every violated constraint; empty means feasible.
    pub fn check(&self, demand_sum: f64, distance: f64) -> Vec<Violation> {
        let mut violations = Vec::new();
        if demand_sum > self.profile.capacity {
            violations.push(Violation::PayloadExceedsCapacity);
        }
        if distance > self.profile.max_trip_distance {
            violations.push(Violation::DistanceExceedsMax);
        }
        violations
    }

    /// Screens every stop for individual feasibility before planning: a stop
    /// whose demand alone exceeds capacity, or whose direct round trip from
    /// the origin alone exceeds the distance limit, can never be accepted
    /// into any trip. Matrix row/column 0 is the origin; stop i maps to
    /// matrix index i + 1.
    pub fn screen_stops(&self, matrix: &[Vec<f64>], demands: &[f64]) -> Result<(), PlanError> {
        let mut unreachable = Vec::new();
        for (stop_index, &demand) in demands.iter().enumerate() {
            let m = stop_index + 1;
            let round_trip = matrix[0][m] + matrix[m][0];
            let violations = self.check(demand, round_trip);
            if !violations.is_empty() {
                unreachable.push(UnreachableStop { stop_index, violations });
            }
        }

        if unreachable.is_empty() {
            Ok(())
        } else {
            Err(PlanError::UnreachableStop(unreachable))
        }
    }
}
