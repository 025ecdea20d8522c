//! Projection state tracking for a single policy on one path

use crate::assumptions::Assumptions;

/// Survival probabilities below this are treated as exactly zero
pub const SURVIVAL_EPSILON: f64 = 1e-10;

/// State of the policy at a point in time during projection
#[derive(Debug, Clone)]
pub struct PolicyState {
    /// Current projection quarter (0-indexed)
    pub quarter: usize,

    /// Policy year (0-indexed)
    pub policy_year: u32,

    /// Attained age
    pub attained_age: u32,

    /// Account value, never negative
    pub account_value: f64,

    /// Guaranteed benefit base
    pub benefit_base: f64,

    /// Benefit base compounded at the roll-up rate
    pub roll_up_base: f64,

    /// Highest anniversary account value seen
    pub highest_av: f64,

    /// Cumulative withdrawals taken from the account value
    pub cumulative_withdrawals: f64,

    /// Probability the policy is still in force
    pub survival: f64,

    /// Whether the rider has ever funded a withdrawal
    pub shortfall_occurred: bool,

    /// Quarters where the rider charge was capped by the account value
    pub charge_cap_events: u32,

    pub pv_rider_charge: f64,
    pub pv_death_claim: f64,
    pub pv_gmwb_claim: f64,
}

impl PolicyState {
    /// Initialize state at issue
    pub fn from_assumptions(assumptions: &Assumptions) -> Self {
        let initial_av = assumptions.initial_account_value();
        Self {
            quarter: 0,
            policy_year: 0,
            attained_age: assumptions.issue_age,
            account_value: initial_av,
            benefit_base: assumptions.initial_premium,
            roll_up_base: assumptions.initial_premium,
            highest_av: initial_av,
            cumulative_withdrawals: 0.0,
            survival: 1.0,
            shortfall_occurred: false,
            charge_cap_events: 0,
            pv_rider_charge: 0.0,
            pv_death_claim: 0.0,
            pv_gmwb_claim: 0.0,
        }
    }

    /// Move timing to quarter `t`
    pub fn set_quarter(&mut self, t: usize, issue_age: u32) {
        self.quarter = t;
        self.policy_year = (t / 4) as u32;
        self.attained_age = issue_age + self.policy_year;
    }

    /// Last quarter of a policy year
    pub fn is_anniversary(&self) -> bool {
        self.quarter % 4 == 3
    }

    /// The benefit base stops ratcheting once a withdrawal has been taken
    pub fn benefit_base_frozen(&self) -> bool {
        self.cumulative_withdrawals != 0.0
    }

    /// Apply one quarter's persistency to the survival probability
    pub fn apply_persistency(&mut self, persistency: f64) {
        self.survival *= persistency;
        if self.survival < SURVIVAL_EPSILON {
            self.survival = 0.0;
        }
    }
}
