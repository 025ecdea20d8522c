//! Monte Carlo driver: many independent equity paths through the rider engine

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::projection::{RiderEngine, SimulationResult};
use crate::scenario::{EquityPathGenerator, ScenarioRng};
use super::stats::PortfolioStats;

/// How normal draws are assigned to paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeedStrategy {
    /// One generator seeded with `Seed`, consumed strictly in path order
    #[default]
    SingleStream,
    /// Path `i` gets its own generator seeded with `Seed + i`; paths run in parallel
    PerPath,
}

/// Configuration for a Monte Carlo run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed_strategy: SeedStrategy,

    /// Log progress every this many paths (sequential runs only, 0 disables)
    pub progress_interval: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed_strategy: SeedStrategy::SingleStream,
            progress_interval: 1_000,
        }
    }
}

/// Results of a full run, in path order, with their portfolio statistics
#[derive(Debug, Clone)]
pub struct MonteCarloOutput {
    pub results: Vec<SimulationResult>,
    pub stats: PortfolioStats,
}

/// Main Monte Carlo engine
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    engine: RiderEngine,
    generator: EquityPathGenerator,
    config: SimulationConfig,
}

impl MonteCarloEngine {
    /// Create an engine; fails if the assumptions break an invariant
    pub fn new(assumptions: Assumptions, config: SimulationConfig) -> Result<Self> {
        let generator = EquityPathGenerator::new(&assumptions);
        let engine = RiderEngine::new(assumptions)?;
        Ok(Self { engine, generator, config })
    }

    pub fn assumptions(&self) -> &Assumptions {
        self.engine.assumptions()
    }

    pub fn rider_engine(&self) -> &RiderEngine {
        &self.engine
    }

    pub fn generator(&self) -> &EquityPathGenerator {
        &self.generator
    }

    /// Simulate all `NPaths` paths and return their results in path order
    pub fn run(&self) -> Vec<SimulationResult> {
        let a = self.assumptions();
        log::info!(
            "Running {} paths of {} quarters ({:?})",
            a.n_paths,
            self.generator.steps,
            self.config.seed_strategy
        );
        let start = Instant::now();

        let results = match self.config.seed_strategy {
            SeedStrategy::SingleStream => self.run_single_stream(),
            SeedStrategy::PerPath => self.run_per_path(),
        };

        log::info!("Completed {} paths in {:?}", results.len(), start.elapsed());
        results
    }

    /// Run and summarise
    pub fn run_with_stats(&self) -> Result<MonteCarloOutput> {
        let results = self.run();
        let stats = PortfolioStats::from_results(&results, self.assumptions().initial_premium)?;
        Ok(MonteCarloOutput { results, stats })
    }

    /// Regenerate the equity path used for `path_index` (0-based)
    pub fn path_returns(&self, path_index: usize) -> Vec<f64> {
        match self.config.seed_strategy {
            SeedStrategy::SingleStream => {
                let mut rng = ScenarioRng::from_seed(self.assumptions().seed);
                let mut path = vec![0.0; self.generator.steps];
                for _ in 0..=path_index {
                    self.generator.fill(&mut rng, &mut path);
                }
                path
            }
            SeedStrategy::PerPath => {
                let mut rng = ScenarioRng::for_path(self.assumptions().seed, path_index);
                self.generator.generate(&mut rng)
            }
        }
    }

    fn run_single_stream(&self) -> Vec<SimulationResult> {
        let n_paths = self.assumptions().n_paths;
        let mut rng = ScenarioRng::from_seed(self.assumptions().seed);
        let mut path = vec![0.0; self.generator.steps];
        let mut results = Vec::with_capacity(n_paths);

        for i in 0..n_paths {
            self.generator.fill(&mut rng, &mut path);
            results.push(self.engine.simulate(&path));

            let done = i + 1;
            if self.config.progress_interval > 0 && done % self.config.progress_interval == 0 {
                log::debug!("Completed {} paths...", done);
            }
        }
        results
    }

    fn run_per_path(&self) -> Vec<SimulationResult> {
        let seed = self.assumptions().seed;
        (0..self.assumptions().n_paths)
            .into_par_iter()
            .map(|i| {
                let mut rng = ScenarioRng::for_path(seed, i);
                let path = self.generator.generate(&mut rng);
                self.engine.simulate(&path)
            })
            .collect()
    }
}
