//! Error taxonomy for the planning pipeline.
//!
//! Everything here is returned as a value to the caller; nothing in the
//! planning path panics. Simulator publish failures are logged and swallowed
//! at the call site, never surfaced through this type.

use thiserror::Error;

/// A single violated feasibility constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    PayloadExceedsCapacity,
    DistanceExceedsMax,
}

impl Violation {
    pub fn message(&self) -> &'static str {
        match self {
            Violation::PayloadExceedsCapacity => "payload exceeds vehicle capacity",
            Violation::DistanceExceedsMax => "route distance exceeds maximum_distance",
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A stop that can never be served by the vehicle on its own, with the
/// constraints it breaks. `stop_index` is the position in the request's
/// destination list.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreachableStop {
    pub stop_index: usize,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Error)]
pub enum PlanError {
    /// Missing or malformed input; surfaced before any upstream call.
    #[error("{0}")]
    Validation(String),

    /// A routing provider returned non-success or was unreachable. Aborts
    /// the whole operation; never retried.
    #[error("{provider} error (status {status}): {body}")]
    Upstream {
        provider: &'static str,
        status: String,
        body: String,
    },

    /// The finalized route breaks one or more vehicle limits. Lists every
    /// violated constraint, not just the first.
    #[error("{}", join_violations(.0))]
    Feasibility(Vec<Violation>),

    /// One or more stops can never fit any trip (demand alone exceeds
    /// capacity, or the direct round trip alone exceeds the distance limit).
    /// Detected before planning so the greedy loop cannot spin on them.
    #[error("{}", format_unreachable(.0))]
    UnreachableStop(Vec<UnreachableStop>),
}

impl PlanError {
    pub fn upstream(provider: &'static str, status: impl ToString, body: impl ToString) -> Self {
        PlanError::Upstream {
            provider,
            status: status.to_string(),
            body: body.to_string(),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::message)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_unreachable(stops: &[UnreachableStop]) -> String {
    stops
        .iter()
        .map(|stop| format!("stop {} unreachable: {}", stop.stop_index, join_violations(&stop.violations)))
        .collect::<Vec<_>>()
        .join(" | ")
}
