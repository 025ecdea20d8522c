//! Pricing assumptions for the GMWB/GMDB rider
//!
//! One flat record of named parameters, fixed for the duration of a run,
//! plus the derived withdrawal-rate schedule and decrement rates.

mod mortality;
mod product;
pub mod loader;

pub use mortality::DecrementBasis;
pub use product::{max_withdrawal_rate, WithdrawalBand, WITHDRAWAL_BANDS};

use crate::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for all pricing assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Assumptions {
    /// Single premium paid at issue
    pub initial_premium: f64,

    /// Premium credit added to the account value at issue (not to the benefit base)
    pub premium_credit_rate: f64,

    pub issue_age: u32,

    /// Age from which guaranteed withdrawals are taken
    pub first_withdrawal_age: u32,

    /// Terminal age of the projection
    pub last_age: u32,

    /// Annual rider charge as a rate on the benefit base
    pub rider_charge: f64,

    /// Annual compound roll-up rate of the benefit base
    pub roll_up_rate: f64,

    /// Number of policy years the roll-up applies
    pub roll_up_years: u32,

    /// Total annual fund and M&E fee drag on the account value
    pub total_annual_fee: f64,

    pub risk_free_rate: f64,
    pub equity_drift: f64,
    pub volatility: f64,

    /// Weight of the fixed-rate bucket in the account value
    pub fixed_target: f64,

    /// Annual lapse rate (applies only while AV > 0)
    pub lapse_rate: f64,

    /// Annual mortality rate in policy year 1
    pub mortality_base: f64,

    /// Annual compound growth of the mortality rate by policy year
    pub mortality_improve: f64,

    /// Number of Monte Carlo paths
    pub n_paths: usize,

    /// Seed of the pseudo-random normal source
    pub seed: u64,
}

impl Default for Assumptions {
    /// 2012 pricing basis
    fn default() -> Self {
        Self {
            initial_premium: 100_000.0,
            premium_credit_rate: 0.07,
            issue_age: 60,
            first_withdrawal_age: 70,
            last_age: 100,
            rider_charge: 0.0095,
            roll_up_rate: 0.06,
            roll_up_years: 15,
            total_annual_fee: 0.0238,
            risk_free_rate: 0.0485,
            equity_drift: 0.092,
            volatility: 0.192,
            fixed_target: 0.30,
            lapse_rate: 0.068,
            mortality_base: 0.006,
            mortality_improve: 0.12,
            n_paths: 10_000,
            seed: 42,
        }
    }
}

impl Assumptions {
    /// Load assumptions from a JSON file; missing fields keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let assumptions = loader::load_json(path)?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Maximum annual withdrawal rate at the given attained age
    pub fn maw_rate(&self, age: u32) -> f64 {
        max_withdrawal_rate(age)
    }

    /// Account value at issue, including the premium credit
    pub fn initial_account_value(&self) -> f64 {
        self.initial_premium * (1.0 + self.premium_credit_rate)
    }

    /// Policy term in whole years
    pub fn term_years(&self) -> u32 {
        self.last_age.saturating_sub(self.issue_age)
    }

    /// Number of quarterly steps in a full path
    pub fn steps(&self) -> usize {
        self.term_years() as usize * 4
    }

    pub fn decrements(&self) -> DecrementBasis {
        DecrementBasis::from_assumptions(self)
    }

    /// Check the invariants a run relies on
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("PremiumCreditRate", self.premium_credit_rate),
            ("RiderCharge", self.rider_charge),
            ("RollUpRate", self.roll_up_rate),
            ("TotalAnnualFee", self.total_annual_fee),
            ("RiskFreeRate", self.risk_free_rate),
            ("EquityDrift", self.equity_drift),
            ("Volatility", self.volatility),
            ("FixedTarget", self.fixed_target),
            ("LapseRate", self.lapse_rate),
            ("MortalityBase", self.mortality_base),
            ("MortalityImprove", self.mortality_improve),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(PricingError::invalid(
                    field,
                    format!("must be a finite non-negative rate, got {}", value),
                ));
            }
        }

        if !self.initial_premium.is_finite() || self.initial_premium <= 0.0 {
            return Err(PricingError::invalid(
                "InitialPremium",
                format!("must be positive, got {}", self.initial_premium),
            ));
        }
        if self.fixed_target > 1.0 {
            return Err(PricingError::invalid(
                "FixedTarget",
                format!("must lie in [0, 1], got {}", self.fixed_target),
            ));
        }
        if self.mortality_base > 1.0 {
            return Err(PricingError::invalid(
                "MortalityBase",
                format!("must not exceed 1, got {}", self.mortality_base),
            ));
        }
        if self.first_withdrawal_age < self.issue_age {
            return Err(PricingError::invalid(
                "FirstWithdrawalAge",
                format!(
                    "{} is before issue age {}",
                    self.first_withdrawal_age, self.issue_age
                ),
            ));
        }
        if self.last_age <= self.issue_age {
            return Err(PricingError::invalid(
                "LastAge",
                format!("{} must exceed issue age {}", self.last_age, self.issue_age),
            ));
        }
        if self.n_paths == 0 {
            return Err(PricingError::invalid("NPaths", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let a = Assumptions::default();
        assert!(a.validate().is_ok());
        assert_eq!(a.steps(), 160);
        assert!((a.initial_account_value() - 107_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_withdrawal_before_issue() {
        let a = Assumptions {
            first_withdrawal_age: 55,
            ..Default::default()
        };
        match a.validate() {
            Err(PricingError::InvalidAssumption { field, .. }) => {
                assert_eq!(field, "FirstWithdrawalAge")
            }
            other => panic!("expected invalid assumption, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            Assumptions { initial_premium: -1.0, ..Default::default() },
            Assumptions { initial_premium: 0.0, ..Default::default() },
            Assumptions { last_age: 60, ..Default::default() },
            Assumptions { n_paths: 0, ..Default::default() },
            Assumptions { volatility: -0.1, ..Default::default() },
            Assumptions { lapse_rate: f64::NAN, ..Default::default() },
            Assumptions { fixed_target: 1.5, ..Default::default() },
        ];
        for a in cases {
            assert!(a.validate().is_err(), "accepted {:?}", a);
        }
    }

    #[test]
    fn test_maw_rate_steps() {
        let a = Assumptions::default();
        assert_eq!(a.maw_rate(60), 0.05);
        assert_eq!(a.maw_rate(65), 0.06);
        assert_eq!(a.maw_rate(75), 0.06);
        assert_eq!(a.maw_rate(76), 0.07);
    }
}
