//! Portfolio statistics over a set of path results
//!
//! Tail metrics use a loss-positive convention: a VaR of 1 500 means the
//! 5th-percentile path lost 1 500 in present value.

use serde::{Deserialize, Serialize};
use crate::error::{PricingError, Result};
use crate::projection::SimulationResult;

/// Tail level used for the reported VaR and CTE
pub const TAIL_LEVEL: f64 = 0.05;

/// Portfolio-level view of a Monte Carlo run, recomputed from the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub n_paths: usize,
    pub mean_profit: f64,
    /// Sample standard deviation of PV profit
    pub std_profit: f64,
    /// Mean profit as a percentage of initial premium
    pub mean_margin_pct: f64,
    /// Percentage of paths with positive profit
    pub profitability_pct: f64,
    /// 5% Value-at-Risk, as a positive loss
    pub var_5: f64,
    /// Mean loss over the worst 5% of paths, as a positive loss
    pub cte_5: f64,
    pub mean_pv_rider_charge: f64,
    pub mean_pv_death_claim: f64,
    pub mean_pv_gmwb_claim: f64,
    pub mean_final_benefit_base: f64,
    pub mean_charge_cap_events: f64,
    /// Percentage of paths where the rider funded a withdrawal
    pub shortfall_pct: f64,
}

impl PortfolioStats {
    /// Compute statistics; an empty result set is an error
    pub fn from_results(results: &[SimulationResult], initial_premium: f64) -> Result<Self> {
        if results.is_empty() {
            return Err(PricingError::EmptyResults);
        }
        let n = results.len() as f64;
        let profits: Vec<f64> = results.iter().map(|r| r.pv_profit).collect();

        let mean_profit = mean(&profits);
        let std_profit = if results.len() > 1 {
            let ss: f64 = profits.iter().map(|p| (p - mean_profit).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        let positive = profits.iter().filter(|&&p| p > 0.0).count();
        let shortfalls = results.iter().filter(|r| r.shortfall_occurred).count();

        Ok(Self {
            n_paths: results.len(),
            mean_profit,
            std_profit,
            mean_margin_pct: mean_profit / initial_premium * 100.0,
            profitability_pct: positive as f64 * 100.0 / n,
            var_5: value_at_risk(&profits, TAIL_LEVEL),
            cte_5: conditional_tail_expectation(&profits, TAIL_LEVEL),
            mean_pv_rider_charge: results.iter().map(|r| r.pv_rider_charge).sum::<f64>() / n,
            mean_pv_death_claim: results.iter().map(|r| r.pv_death_claim).sum::<f64>() / n,
            mean_pv_gmwb_claim: results.iter().map(|r| r.pv_gmwb_claim).sum::<f64>() / n,
            mean_final_benefit_base: results.iter().map(|r| r.final_benefit_base).sum::<f64>() / n,
            mean_charge_cap_events: results.iter().map(|r| r.charge_cap_events as f64).sum::<f64>() / n,
            shortfall_pct: shortfalls as f64 * 100.0 / n,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sorted_ascending(profits: &[f64]) -> Vec<f64> {
    let mut sorted = profits.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Rank of the tail observation in an ascending list of `n` values
fn tail_rank(n: usize, level: f64) -> usize {
    ((n as f64 * level) as usize).min(n.saturating_sub(1))
}

/// Profit at rank floor(n * level) of the ascending-sorted profits, negated.
///
/// Panics on an empty slice.
pub fn value_at_risk(profits: &[f64], level: f64) -> f64 {
    assert!(!profits.is_empty(), "value_at_risk requires at least one profit");
    let sorted = sorted_ascending(profits);
    -sorted[tail_rank(sorted.len(), level)]
}

/// Mean of the worst floor(n * level) profits (at least one), negated.
///
/// Panics on an empty slice.
pub fn conditional_tail_expectation(profits: &[f64], level: f64) -> f64 {
    assert!(!profits.is_empty(), "conditional_tail_expectation requires at least one profit");
    let sorted = sorted_ascending(profits);
    let k = tail_rank(sorted.len(), level).max(1);
    -mean(&sorted[..k])
}
