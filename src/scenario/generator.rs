//! Lognormal quarterly equity return paths
//!
//! Each quarterly simple return is exp(mu_q + sigma_q * z) - 1 with
//! mu_q = (drift - vol^2 / 2) / 4 and sigma_q = vol / 2.
//!
//! sigma_q is vol / 2 as used by the pricing basis, not vol / sqrt(4)
//! re-derived from a different quarter scaling. Keep the ratio as is.

use crate::assumptions::Assumptions;
use super::ScenarioRng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPathGenerator {
    /// Quarterly log drift
    pub mu_q: f64,
    /// Quarterly log volatility
    pub sigma_q: f64,
    /// Quarters per path
    pub steps: usize,
}

impl EquityPathGenerator {
    pub fn new(assumptions: &Assumptions) -> Self {
        let vol = assumptions.volatility;
        Self {
            mu_q: (assumptions.equity_drift - 0.5 * vol * vol) / 4.0,
            sigma_q: vol / 2.0,
            steps: assumptions.steps(),
        }
    }

    /// Simple quarterly return for one standard normal draw
    #[inline]
    pub fn quarterly_return(&self, z: f64) -> f64 {
        (self.mu_q + self.sigma_q * z).exp() - 1.0
    }

    /// Draw one full path of `steps` quarterly returns
    pub fn generate(&self, rng: &mut ScenarioRng) -> Vec<f64> {
        let mut path = vec![0.0; self.steps];
        self.fill(rng, &mut path);
        path
    }

    /// Overwrite `path` with quarterly returns, consuming one draw per element
    pub fn fill(&self, rng: &mut ScenarioRng, path: &mut [f64]) {
        rng.fill_normal(path);
        for r in path.iter_mut() {
            *r = self.quarterly_return(*r);
        }
    }
}
