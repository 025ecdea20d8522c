//! Quarterly cash-flow engine for the GMWB/GMDB rider
//!
//! Runs one policy through its quarterly life cycle on a single equity
//! path and accumulates survival-weighted, discounted rider cash flows.
//! Within a quarter the steps are applied in a fixed order: decrements,
//! growth, fees, rider charge, benefit base ratchet, withdrawal, death
//! claim, discounting.

use crate::assumptions::{Assumptions, DecrementBasis};
use crate::error::Result;
use super::state::PolicyState;
use super::cashflows::{PathProjection, QuarterRow, SimulationResult};

/// Main rider projection engine
#[derive(Debug, Clone)]
pub struct RiderEngine {
    assumptions: Assumptions,
    decrements: DecrementBasis,
}

impl RiderEngine {
    /// Create an engine; fails if the assumptions break an invariant
    pub fn new(assumptions: Assumptions) -> Result<Self> {
        assumptions.validate()?;
        let decrements = assumptions.decrements();
        Ok(Self { assumptions, decrements })
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Project one path and return only the present-value result
    pub fn simulate(&self, equity_returns: &[f64]) -> SimulationResult {
        self.project_path(equity_returns, false).result
    }

    /// Project one path.
    ///
    /// At most `(LastAge - IssueAge) * 4` quarters are processed; extra
    /// returns are ignored. When `detailed` is set every quarter is recorded.
    pub fn project_path(&self, equity_returns: &[f64], detailed: bool) -> PathProjection {
        let a = &self.assumptions;
        let steps = equity_returns.len().min(a.steps());
        if equity_returns.len() > steps {
            log::warn!(
                "Return path has {} quarters, truncating to policy term of {}",
                equity_returns.len(),
                steps
            );
        }

        let mut state = PolicyState::from_assumptions(a);
        let mut quarters = if detailed { Vec::with_capacity(steps) } else { Vec::new() };

        for (t, &equity_return) in equity_returns.iter().take(steps).enumerate() {
            state.set_quarter(t, a.issue_age);
            if state.attained_age > a.last_age {
                break;
            }

            let row = self.calculate_quarter(&mut state, equity_return);
            if detailed {
                quarters.push(row);
            }
        }

        let result = SimulationResult::new(
            state.pv_rider_charge,
            state.pv_death_claim,
            state.pv_gmwb_claim,
            a.initial_premium,
            state.benefit_base,
            state.charge_cap_events,
            state.shortfall_occurred,
        );

        PathProjection { result, quarters }
    }

    /// Calculate one quarter's transition and accumulate its cash flows
    fn calculate_quarter(&self, state: &mut PolicyState, equity_return: f64) -> QuarterRow {
        let mut row = QuarterRow {
            quarter: state.quarter,
            policy_year: state.policy_year,
            attained_age: state.attained_age,
            bop_av: state.account_value,
            equity_return,
            ..Default::default()
        };

        // 1. Decrements (none in the first quarter)
        self.apply_decrements(state, &mut row);

        // 2-4. Growth, fees, rider charge
        let av_pre_withdrawal = self.roll_forward_account_value(state, &mut row);

        // 5. Benefit base ratchet at anniversaries
        self.update_benefit_base(state, av_pre_withdrawal);

        // 6. Withdrawal
        self.apply_withdrawal(state, &mut row, av_pre_withdrawal);

        // 7. Death claim at anniversaries
        if state.is_anniversary() {
            let death_benefit = state.account_value.max(state.benefit_base);
            row.death_claim = row.mortality_rate * death_benefit;
        }

        // 8. Mid-quarter discounting
        row.discount_factor = self.discount_factor(state.quarter);

        // 9. Expected present values
        let weight = state.survival * row.discount_factor;
        state.pv_rider_charge += row.rider_charge * weight;
        state.pv_death_claim += row.death_claim * weight;
        state.pv_gmwb_claim += row.shortfall_withdrawal * weight;

        row.survival = state.survival;
        row.eop_av = state.account_value;
        row.roll_up_base = state.roll_up_base;
        row.highest_av = state.highest_av;
        row.benefit_base = state.benefit_base;
        row
    }

    /// Survival update at the start of the quarter
    fn apply_decrements(&self, state: &mut PolicyState, row: &mut QuarterRow) {
        if state.quarter == 0 {
            return;
        }
        row.mortality_rate = self.decrements.quarterly_mortality(state.policy_year);
        row.lapse_rate = self.decrements.quarterly_lapse(state.account_value);
        state.apply_persistency(1.0 - row.mortality_rate - row.lapse_rate);
    }

    /// Grow the account value, take fees and the rider charge.
    /// Returns the account value available for withdrawal.
    fn roll_forward_account_value(&self, state: &mut PolicyState, row: &mut QuarterRow) -> f64 {
        let a = &self.assumptions;

        let fixed_return = a.risk_free_rate / 4.0;
        row.weighted_return =
            a.fixed_target * fixed_return + (1.0 - a.fixed_target) * row.equity_return;
        let av_pre_fee = state.account_value * (1.0 + row.weighted_return);

        row.fees = av_pre_fee * a.total_annual_fee / 4.0;
        let av_pre_charge = (av_pre_fee - row.fees).max(0.0);

        // Charged on the benefit base, limited to what the account holds
        row.rider_charge_raw = state.benefit_base * a.rider_charge / 4.0;
        row.rider_charge = row.rider_charge_raw.min(av_pre_charge);
        if row.rider_charge < row.rider_charge_raw {
            row.charge_capped = true;
            state.charge_cap_events += 1;
        }

        (av_pre_charge - row.rider_charge).max(0.0)
    }

    /// Roll-up and high-water ratchet, only at anniversaries before any withdrawal
    fn update_benefit_base(&self, state: &mut PolicyState, av_pre_withdrawal: f64) {
        if !state.is_anniversary() || state.benefit_base_frozen() {
            return;
        }
        let a = &self.assumptions;
        if state.policy_year < a.roll_up_years {
            state.roll_up_base *= 1.0 + a.roll_up_rate;
        }
        state.highest_av = state.highest_av.max(av_pre_withdrawal);
        state.benefit_base = state.roll_up_base.max(state.highest_av);
    }

    /// Take the quarterly guaranteed withdrawal; the rider funds any part the AV cannot
    fn apply_withdrawal(&self, state: &mut PolicyState, row: &mut QuarterRow, av_pre_withdrawal: f64) {
        let a = &self.assumptions;
        if state.attained_age < a.first_withdrawal_age {
            state.account_value = av_pre_withdrawal;
            return;
        }

        let quarterly_entitlement = state.benefit_base * a.maw_rate(state.attained_age) / 4.0;
        if av_pre_withdrawal >= quarterly_entitlement {
            row.withdrawal_from_av = quarterly_entitlement;
            state.account_value = av_pre_withdrawal - quarterly_entitlement;
        } else {
            row.withdrawal_from_av = av_pre_withdrawal;
            row.shortfall_withdrawal = quarterly_entitlement - av_pre_withdrawal;
            state.account_value = 0.0;
            state.shortfall_occurred = true;
        }
        state.cumulative_withdrawals += row.withdrawal_from_av;
    }

    /// Discount factor at mid-quarter
    pub fn discount_factor(&self, quarter: usize) -> f64 {
        let t_years = quarter as f64 / 4.0 + 0.125;
        (1.0 + self.assumptions.risk_free_rate).powf(-t_years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use crate::scenario::{EquityPathGenerator, ScenarioRng};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// No market movement, no decrements
    fn flat_assumptions() -> Assumptions {
        Assumptions {
            mortality_base: 0.0,
            mortality_improve: 0.0,
            lapse_rate: 0.0,
            volatility: 0.0,
            ..Default::default()
        }
    }

    fn stochastic_projection(a: Assumptions, seed: u64) -> PathProjection {
        let generator = EquityPathGenerator::new(&a);
        let path = generator.generate(&mut ScenarioRng::from_seed(seed));
        RiderEngine::new(a).unwrap().project_path(&path, true)
    }

    #[test]
    fn test_rejects_invalid_assumptions() {
        let a = Assumptions {
            last_age: 50,
            ..Default::default()
        };
        assert!(matches!(
            RiderEngine::new(a),
            Err(PricingError::InvalidAssumption { field: "LastAge", .. })
        ));
    }

    #[test]
    fn test_first_quarter_hand_computed() {
        let a = flat_assumptions();
        let engine = RiderEngine::new(a.clone()).unwrap();
        let projection = engine.project_path(&vec![0.0; a.steps()], true);
        let q0 = &projection.quarters[0];

        let weighted = 0.30 * 0.0485 / 4.0;
        let av_pre_fee = 107_000.0 * (1.0 + weighted);
        let av_pre_charge = av_pre_fee * (1.0 - 0.0238 / 4.0);

        assert_relative_eq!(q0.weighted_return, weighted, epsilon = 1e-15);
        assert_relative_eq!(q0.fees, av_pre_fee * 0.0238 / 4.0, epsilon = 1e-9);
        assert_relative_eq!(q0.rider_charge_raw, 237.5, epsilon = 1e-9);
        assert_relative_eq!(q0.rider_charge, 237.5, epsilon = 1e-9);
        assert!(!q0.charge_capped);
        assert_relative_eq!(q0.eop_av, av_pre_charge - 237.5, epsilon = 1e-6);
        assert_eq!(q0.survival, 1.0);
        assert_eq!(q0.mortality_rate, 0.0);
        assert_relative_eq!(q0.discount_factor, 1.0485f64.powf(-0.125), epsilon = 1e-15);
    }

    #[test]
    fn test_one_year_term_hand_computed() {
        // Zero interest, zero fees, flat equity: AV only pays 250 per quarter
        let a = Assumptions {
            issue_age: 60,
            last_age: 61,
            risk_free_rate: 0.0,
            total_annual_fee: 0.0,
            fixed_target: 0.0,
            rider_charge: 0.01,
            ..flat_assumptions()
        };
        let engine = RiderEngine::new(a).unwrap();
        let projection = engine.project_path(&[0.0; 4], true);
        let r = projection.result;

        assert_eq!(projection.quarters.len(), 4);
        assert_relative_eq!(r.pv_rider_charge, 1_000.0, epsilon = 1e-9);
        assert_eq!(r.pv_death_claim, 0.0);
        assert_eq!(r.pv_gmwb_claim, 0.0);
        assert_relative_eq!(r.pv_profit, 1_000.0, epsilon = 1e-9);
        assert_relative_eq!(r.profit_margin_pct, 1.0, epsilon = 1e-12);

        // Roll-up to 106 000 loses to the 107 000 issue high-water mark
        let anniversary = &projection.quarters[3];
        assert_relative_eq!(anniversary.roll_up_base, 106_000.0, epsilon = 1e-9);
        assert_relative_eq!(anniversary.eop_av, 106_000.0, epsilon = 1e-9);
        assert_relative_eq!(r.final_benefit_base, 107_000.0, epsilon = 1e-9);
        assert_eq!(r.charge_cap_events, 0);
        assert!(!r.shortfall_occurred);
    }

    #[test]
    fn test_death_claim_on_anniversary_only() {
        let a = Assumptions {
            mortality_base: 0.02,
            ..flat_assumptions()
        };
        let engine = RiderEngine::new(a.clone()).unwrap();
        let projection = engine.project_path(&vec![0.0; a.steps()], true);
        let q = a.decrements().quarterly_mortality(0);

        for row in &projection.quarters[..8] {
            if row.quarter % 4 == 3 {
                let expected = row.mortality_rate * row.eop_av.max(row.benefit_base);
                assert_relative_eq!(row.death_claim, expected, epsilon = 1e-9);
                assert!(row.death_claim > 0.0);
            } else {
                assert_eq!(row.death_claim, 0.0);
            }
        }
        assert_relative_eq!(projection.quarters[3].mortality_rate, q, epsilon = 1e-15);
        assert_relative_eq!(projection.quarters[1].survival, 1.0 - q, epsilon = 1e-15);
    }

    #[test]
    fn test_lapse_stops_once_account_is_empty() {
        let a = Assumptions {
            issue_age: 70,
            first_withdrawal_age: 70,
            last_age: 90,
            ..Default::default()
        };
        let engine = RiderEngine::new(a.clone()).unwrap();
        let projection = engine.project_path(&vec![-0.3; a.steps()], true);

        let depleted = projection
            .quarters
            .iter()
            .position(|r| r.eop_av == 0.0)
            .expect("account should deplete");
        for row in &projection.quarters[depleted + 1..] {
            assert_eq!(row.lapse_rate, 0.0);
        }
        assert!(projection.quarters[1].lapse_rate > 0.0);
    }

    #[test]
    fn test_account_value_and_survival_bounds() {
        for seed in 0..20 {
            let projection = stochastic_projection(Assumptions::default(), seed);
            let mut prev_survival = 1.0;
            for row in &projection.quarters {
                assert!(row.eop_av >= 0.0);
                assert!(row.survival >= 0.0 && row.survival <= 1.0);
                assert!(row.survival <= prev_survival);
                prev_survival = row.survival;
            }
        }
    }

    #[test]
    fn test_rider_charge_cap_counting() {
        let a = Assumptions {
            issue_age: 70,
            first_withdrawal_age: 70,
            last_age: 95,
            ..Default::default()
        };
        let engine = RiderEngine::new(a.clone()).unwrap();
        let projection = engine.project_path(&vec![-0.15; a.steps()], true);

        let mut caps = 0;
        for row in &projection.quarters {
            assert!(row.rider_charge <= row.rider_charge_raw);
            assert_eq!(row.charge_capped, row.rider_charge != row.rider_charge_raw);
            if row.charge_capped {
                caps += 1;
            }
        }
        assert!(caps > 0);
        assert_eq!(projection.result.charge_cap_events, caps);
    }

    #[test]
    fn test_benefit_base_ratchets_then_freezes() {
        for seed in 0..20 {
            let projection = stochastic_projection(Assumptions::default(), seed);
            let first_wd = projection
                .first_withdrawal_quarter()
                .expect("withdrawals start at 70");
            let mut prev = Assumptions::default().initial_premium;
            for row in &projection.quarters[..first_wd] {
                assert!(row.benefit_base >= prev);
                prev = row.benefit_base;
            }
            let frozen = projection.quarters[first_wd].benefit_base;
            for row in &projection.quarters[first_wd..] {
                assert_eq!(row.benefit_base, frozen);
            }
            assert_eq!(projection.result.final_benefit_base, frozen);
        }
    }

    #[test]
    fn test_roll_up_limited_to_roll_up_years() {
        let a = Assumptions {
            roll_up_years: 2,
            first_withdrawal_age: 70,
            ..flat_assumptions()
        };
        let engine = RiderEngine::new(a.clone()).unwrap();
        let projection = engine.project_path(&vec![0.0; a.steps()], true);

        let expected = 100_000.0 * 1.06 * 1.06;
        assert_relative_eq!(projection.quarters[7].roll_up_base, expected, epsilon = 1e-6);
        assert_relative_eq!(projection.quarters[11].roll_up_base, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_shortfall_is_permanent_and_av_stays_zero() {
        let a = Assumptions {
            issue_age: 70,
            first_withdrawal_age: 70,
            last_age: 95,
            ..Default::default()
        };
        let engine = RiderEngine::new(a.clone()).unwrap();
        let projection = engine.project_path(&vec![-0.05; a.steps()], true);

        let first = projection
            .first_shortfall_quarter()
            .expect("entitlement should exceed the account value");
        for row in &projection.quarters[first..] {
            assert_eq!(row.eop_av, 0.0);
            assert!(row.shortfall_withdrawal > 0.0);
        }
        assert!(projection.result.shortfall_occurred);
        assert!(projection.result.pv_gmwb_claim > 0.0);
    }

    #[test]
    fn test_no_withdrawals_before_first_withdrawal_age() {
        let projection = stochastic_projection(Assumptions::default(), 3);
        for row in &projection.quarters {
            if row.attained_age < 70 {
                assert_eq!(row.withdrawal_from_av, 0.0);
                assert_eq!(row.shortfall_withdrawal, 0.0);
            }
        }
        assert_eq!(projection.first_withdrawal_quarter(), Some(40));
    }

    #[test]
    fn test_withdrawal_amount_uses_age_band() {
        let a = Assumptions {
            issue_age: 65,
            first_withdrawal_age: 65,
            ..flat_assumptions()
        };
        let engine = RiderEngine::new(a.clone()).unwrap();
        let projection = engine.project_path(&vec![0.0; a.steps()], true);

        let q0 = &projection.quarters[0];
        assert_relative_eq!(q0.withdrawal_from_av, 100_000.0 * 0.06 / 4.0, epsilon = 1e-9);
        // Frozen before the first anniversary
        assert_eq!(projection.result.final_benefit_base, 100_000.0);
    }

    #[test]
    fn test_profit_identity_holds_exactly() {
        for seed in 0..10 {
            let r = stochastic_projection(Assumptions::default(), seed).result;
            assert_eq!(r.pv_profit, r.pv_rider_charge - r.pv_death_claim - r.pv_gmwb_claim);
        }
    }

    #[test]
    fn test_longer_path_is_truncated_to_term() {
        let a = Assumptions {
            issue_age: 60,
            last_age: 70,
            ..Default::default()
        };
        let generator = EquityPathGenerator::new(&a);
        let path = generator.generate(&mut ScenarioRng::from_seed(8));
        let mut longer = path.clone();
        longer.extend(std::iter::repeat(-0.9).take(20));

        let engine = RiderEngine::new(a).unwrap();
        let exact = engine.project_path(&path, true);
        let truncated = engine.project_path(&longer, true);

        assert_eq!(truncated.quarters.len(), 40);
        assert_eq!(exact.result, truncated.result);
    }

    #[test]
    fn test_summary_matches_detailed() {
        let a = Assumptions::default();
        let generator = EquityPathGenerator::new(&a);
        let path = generator.generate(&mut ScenarioRng::from_seed(21));
        let engine = RiderEngine::new(a).unwrap();

        let summary = engine.simulate(&path);
        let detailed = engine.project_path(&path, true);
        assert_eq!(summary, detailed.result);
        assert!(engine.project_path(&path, false).quarters.is_empty());
    }

    #[test]
    fn test_pv_accumulation_matches_trace() {
        let projection = stochastic_projection(Assumptions::default(), 4);
        let pv_charge: f64 = projection
            .quarters
            .iter()
            .map(|r| r.survival * r.rider_charge * r.discount_factor)
            .sum();
        assert_abs_diff_eq!(projection.result.pv_rider_charge, pv_charge, epsilon = 1e-6);
    }
}
