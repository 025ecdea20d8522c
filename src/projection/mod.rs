//! Rider projection engine for a single policy on one equity path

mod state;
mod engine;
mod cashflows;

pub use state::{PolicyState, SURVIVAL_EPSILON};
pub use engine::RiderEngine;
pub use cashflows::{PathProjection, QuarterRow, SimulationResult};
