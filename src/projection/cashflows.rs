//! Projection output structures: per-quarter trace and per-path result

use serde::{Deserialize, Serialize};

/// A single row of projection output for one quarter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuarterRow {
    // Timing
    pub quarter: usize,
    pub policy_year: u32,
    pub attained_age: u32,

    // Decrements
    pub mortality_rate: f64,
    pub lapse_rate: f64,
    pub survival: f64,

    // Account value roll-forward
    pub bop_av: f64,
    pub equity_return: f64,
    pub weighted_return: f64,
    pub fees: f64,
    pub rider_charge_raw: f64,
    pub rider_charge: f64,
    pub charge_capped: bool,
    pub withdrawal_from_av: f64,
    pub shortfall_withdrawal: f64,
    pub eop_av: f64,

    // Guarantee
    pub roll_up_base: f64,
    pub highest_av: f64,
    pub benefit_base: f64,
    pub death_claim: f64,

    pub discount_factor: f64,
}

/// Present-value result of one simulated path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub pv_rider_charge: f64,
    pub pv_death_claim: f64,
    pub pv_gmwb_claim: f64,
    /// Rider charges less death and GMWB claims
    pub pv_profit: f64,
    /// PV profit as a percentage of initial premium
    pub profit_margin_pct: f64,
    pub final_benefit_base: f64,
    pub charge_cap_events: u32,
    /// Whether the rider ever funded a withdrawal
    pub shortfall_occurred: bool,
}

impl SimulationResult {
    pub fn new(
        pv_rider_charge: f64,
        pv_death_claim: f64,
        pv_gmwb_claim: f64,
        initial_premium: f64,
        final_benefit_base: f64,
        charge_cap_events: u32,
        shortfall_occurred: bool,
    ) -> Self {
        let pv_profit = pv_rider_charge - pv_death_claim - pv_gmwb_claim;
        Self {
            pv_rider_charge,
            pv_death_claim,
            pv_gmwb_claim,
            pv_profit,
            profit_margin_pct: pv_profit / initial_premium * 100.0,
            final_benefit_base,
            charge_cap_events,
            shortfall_occurred,
        }
    }
}

/// Complete projection of one path: the result plus, when requested, the quarterly trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathProjection {
    pub result: SimulationResult,
    pub quarters: Vec<QuarterRow>,
}

impl PathProjection {
    /// Total rider charges collected, undiscounted and unweighted by survival
    pub fn total_rider_charges(&self) -> f64 {
        self.quarters.iter().map(|r| r.rider_charge).sum()
    }

    /// Total insurer-funded withdrawals, undiscounted and unweighted by survival
    pub fn total_shortfall(&self) -> f64 {
        self.quarters.iter().map(|r| r.shortfall_withdrawal).sum()
    }

    /// First quarter in which a withdrawal was taken
    pub fn first_withdrawal_quarter(&self) -> Option<usize> {
        self.quarters
            .iter()
            .find(|r| r.withdrawal_from_av + r.shortfall_withdrawal > 0.0)
            .map(|r| r.quarter)
    }

    /// First quarter in which the rider funded part of a withdrawal
    pub fn first_shortfall_quarter(&self) -> Option<usize> {
        self.quarters
            .iter()
            .find(|r| r.shortfall_withdrawal > 0.0)
            .map(|r| r.quarter)
    }
}
