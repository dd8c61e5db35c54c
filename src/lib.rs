//! trip-planner core
//!
//! Capacitated trip planning and route assembly: a greedy heuristic that
//! splits delivery stops into vehicle trips under capacity and distance
//! limits, an assembler that stitches the per-trip directions into one
//! combined route feature, and a simulator that replays a finalized route
//! to a notification channel.

pub mod assembler;
pub mod error;
pub mod feasibility;
pub mod feature;
pub mod ors;
pub mod planner;
pub mod simulator;
pub mod traits;
pub mod types;
