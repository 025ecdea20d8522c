//! Run output: per-path CSV export, JSON summary and quarterly trace
//!
//! The per-path export has the columns
//! `Path,PV_Profit,Profit_Margin_Pct,Final_Benefit_Base,Charge_Cap_Events`
//! with 1-based path numbers, currency to 0 decimals and the margin to 2.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::projection::{QuarterRow, SimulationResult};
use crate::simulation::PortfolioStats;

/// One row of the per-path export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathExportRow {
    #[serde(rename = "Path")]
    pub path: usize,
    #[serde(rename = "PV_Profit")]
    pub pv_profit: String,
    #[serde(rename = "Profit_Margin_Pct")]
    pub profit_margin_pct: String,
    #[serde(rename = "Final_Benefit_Base")]
    pub final_benefit_base: String,
    #[serde(rename = "Charge_Cap_Events")]
    pub charge_cap_events: u32,
}

impl PathExportRow {
    /// Build the row for the 0-based `path_index`
    pub fn new(path_index: usize, result: &SimulationResult) -> Self {
        Self {
            path: path_index + 1,
            pv_profit: fixed(result.pv_profit, 0),
            profit_margin_pct: fixed(result.profit_margin_pct, 2),
            final_benefit_base: fixed(result.final_benefit_base, 0),
            charge_cap_events: result.charge_cap_events,
        }
    }
}

/// Format with `decimals` places, rounding halves away from zero
pub fn fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    // + 0.0 turns a rounded -0.0 into 0.0
    let rounded = (value * scale).round() / scale + 0.0;
    format!("{:.*}", decimals, rounded)
}

/// Write the per-path export, in path order
pub fn write_path_results<W: Write>(writer: W, results: &[SimulationResult]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (i, result) in results.iter().enumerate() {
        csv_writer.serialize(PathExportRow::new(i, result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_path_results_csv(path: &Path, results: &[SimulationResult]) -> Result<()> {
    write_path_results(File::create(path)?, results)?;
    log::info!("Wrote {} path results to {}", results.len(), path.display());
    Ok(())
}

/// Write one path's quarterly trace, one row per quarter
pub fn write_quarter_trace<W: Write>(writer: W, rows: &[QuarterRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Assumptions and statistics of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub assumptions: Assumptions,
    pub stats: PortfolioStats,
}

pub fn write_summary_json<W: Write>(writer: W, summary: &RunSummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Console summary of portfolio statistics
pub fn format_summary(stats: &PortfolioStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Paths:                 {}\n", stats.n_paths));
    out.push_str(&format!("Mean PV Profit:        ${:.0}\n", stats.mean_profit));
    out.push_str(&format!("Profit Margin:         {:.2}%\n", stats.mean_margin_pct));
    out.push_str(&format!("Profitability:         {:.1}%\n", stats.profitability_pct));
    out.push_str(&format!("VaR 5% Loss:           ${:.0}\n", stats.var_5));
    out.push_str(&format!("CTE 5% Loss:           ${:.0}\n", stats.cte_5));
    out.push_str(&format!("Mean PV Rider Charge:  ${:.0}\n", stats.mean_pv_rider_charge));
    out.push_str(&format!("Mean PV Death Claim:   ${:.0}\n", stats.mean_pv_death_claim));
    out.push_str(&format!("Mean PV GMWB Claim:    ${:.0}\n", stats.mean_pv_gmwb_claim));
    out.push_str(&format!("Mean Final Base:       ${:.0}\n", stats.mean_final_benefit_base));
    out.push_str(&format!("Mean Charge Caps:      {:.1}\n", stats.mean_charge_cap_events));
    out.push_str(&format!("Shortfall Triggered:   {:.1}%\n", stats.shortfall_pct));
    out
}
