//! GMWB Pricer CLI
//!
//! Runs a Monte Carlo pricing of the rider and writes per-path results

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use gmwb_pricer::{
    report::{self, RunSummary},
    Assumptions, MonteCarloEngine, SeedStrategy, SimulationConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "gmwb-pricer",
    version,
    about = "Monte Carlo pricing of a variable annuity GMWB/GMDB rider"
)]
struct Cli {
    /// JSON assumptions file (defaults to the 2012 pricing basis)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of Monte Carlo paths
    #[arg(long)]
    paths: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Seed each path independently and run paths in parallel
    #[arg(long)]
    parallel: bool,

    /// Per-path results CSV
    #[arg(long, default_value = "gmwb_results.csv")]
    output: PathBuf,

    /// Also write assumptions and statistics as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut assumptions = match &cli.config {
        Some(path) => Assumptions::from_json_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::default(),
    };
    if let Some(paths) = cli.paths {
        assumptions.n_paths = paths;
    }
    if let Some(seed) = cli.seed {
        assumptions.seed = seed;
    }

    let config = SimulationConfig {
        seed_strategy: if cli.parallel {
            SeedStrategy::PerPath
        } else {
            SeedStrategy::SingleStream
        },
        ..Default::default()
    };

    println!("GMWB Pricer v{}", env!("CARGO_PKG_VERSION"));
    println!("Running {} paths (seed {})...\n", assumptions.n_paths, assumptions.seed);

    let engine = MonteCarloEngine::new(assumptions.clone(), config)
        .context("invalid pricing assumptions")?;
    let output = engine.run_with_stats()?;

    println!("=== Rider Pricing Results ===");
    print!("{}", report::format_summary(&output.stats));

    report::write_path_results_csv(&cli.output, &output.results)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!("\nResults saved to {}", cli.output.display());

    if let Some(path) = &cli.summary_json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let summary = RunSummary {
            assumptions,
            stats: output.stats,
        };
        report::write_summary_json(file, &summary)?;
        println!("Summary saved to {}", path.display());
    }

    Ok(())
}
