//! Monte Carlo simulation and portfolio statistics

mod runner;
mod stats;

pub use runner::{MonteCarloEngine, MonteCarloOutput, SeedStrategy, SimulationConfig};
pub use stats::{conditional_tail_expectation, value_at_risk, PortfolioStats, TAIL_LEVEL};
