//! Decrement rates: age-graded mortality and account-value lapse
//!
//! Mortality is a single base annual rate grown by a compound factor per
//! policy year, converted to quarterly with the standard actuarial method
//! q_quarterly = 1 - (1 - q_annual)^(1/4).

use super::Assumptions;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecrementBasis {
    /// Annual mortality rate in policy year 1
    pub mortality_base: f64,
    /// Compound annual growth of the mortality rate
    pub mortality_improve: f64,
    /// Annual lapse rate
    pub lapse_rate: f64,
}

impl DecrementBasis {
    pub fn from_assumptions(a: &Assumptions) -> Self {
        Self {
            mortality_base: a.mortality_base,
            mortality_improve: a.mortality_improve,
            lapse_rate: a.lapse_rate,
        }
    }

    /// Annual mortality rate for a 0-indexed policy year, capped at certain death
    pub fn annual_mortality(&self, policy_year: u32) -> f64 {
        (self.mortality_base * (1.0 + self.mortality_improve).powf(policy_year as f64)).min(1.0)
    }

    /// Quarterly mortality rate for a 0-indexed policy year
    pub fn quarterly_mortality(&self, policy_year: u32) -> f64 {
        1.0 - (1.0 - self.annual_mortality(policy_year)).powf(0.25)
    }

    /// Quarterly lapse rate; a policy with no account value cannot lapse
    pub fn quarterly_lapse(&self, account_value: f64) -> f64 {
        if account_value > 0.0 {
            self.lapse_rate / 4.0
        } else {
            0.0
        }
    }
}
