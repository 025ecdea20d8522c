//! GMWB Pricer - Monte Carlo pricing of a variable annuity living/death benefit rider
//!
//! This library provides:
//! - Pricing assumptions with validation and JSON loading
//! - Seeded lognormal quarterly equity scenario generation
//! - A quarterly policy cash-flow engine (roll-up, ratchet, capped rider
//!   charges, guaranteed withdrawals, death benefit, discounting)
//! - A Monte Carlo driver with reproducible sequential and parallel modes
//! - Portfolio statistics (mean margin, profitability, VaR/CTE) and CSV/JSON output

pub mod error;
pub mod assumptions;
pub mod scenario;
pub mod projection;
pub mod simulation;
pub mod report;

// Re-export commonly used types
pub use error::{PricingError, Result};
pub use assumptions::Assumptions;
pub use scenario::{EquityPathGenerator, ScenarioRng};
pub use projection::{RiderEngine, SimulationResult, PathProjection, QuarterRow};
pub use simulation::{MonteCarloEngine, MonteCarloOutput, PortfolioStats, SeedStrategy, SimulationConfig};
