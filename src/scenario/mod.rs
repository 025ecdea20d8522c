//! Stochastic equity scenarios
//!
//! A seeded normal source and the lognormal quarterly return generator that
//! turns normal draws into one equity path per simulated policy.

mod rng;
mod generator;

pub use rng::ScenarioRng;
pub use generator::EquityPathGenerator;
