//! Risk calculation outputs.

use std::fmt;

use qe_models::greeks::Greeks;

/// Aggregated portfolio value, sensitivities and tail risk.
///
/// VaR and ES are reported as positive losses over the configured horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioRiskResult {
    /// Σ price × quantity.
    pub total_pv: f64,
    /// Σ delta × quantity.
    pub total_delta: f64,
    /// Σ gamma × quantity.
    pub total_gamma: f64,
    /// Σ vega × quantity.
    pub total_vega: f64,
    /// Σ theta × quantity (per day).
    pub total_theta: f64,
    /// 95% value at risk.
    pub value_at_risk_95: f64,
    /// 99% value at risk.
    pub value_at_risk_99: f64,
    /// 95% expected shortfall.
    pub expected_shortfall_95: f64,
    /// 99% expected shortfall.
    pub expected_shortfall_99: f64,
}

impl PortfolioRiskResult {
    /// Result carrying only aggregated Greeks, with zero tail metrics.
    pub fn from_totals(totals: Greeks) -> Self {
        Self {
            total_pv: totals.price,
            total_delta: totals.delta,
            total_gamma: totals.gamma,
            total_vega: totals.vega,
            total_theta: totals.theta,
            ..Self::default()
        }
    }

    /// Aggregated Greeks as a [`Greeks`] value.
    pub fn totals(&self) -> Greeks {
        Greeks {
            price: self.total_pv,
            delta: self.total_delta,
            gamma: self.total_gamma,
            vega: self.total_vega,
            theta: self.total_theta,
        }
    }

    /// Every field with its name, in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("total_pv", self.total_pv),
            ("total_delta", self.total_delta),
            ("total_gamma", self.total_gamma),
            ("total_vega", self.total_vega),
            ("total_theta", self.total_theta),
            ("value_at_risk_95", self.value_at_risk_95),
            ("value_at_risk_99", self.value_at_risk_99),
            ("expected_shortfall_95", self.expected_shortfall_95),
            ("expected_shortfall_99", self.expected_shortfall_99),
        ]
    }

    /// Name of the first non-finite field, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.fields()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
            .map(|(name, _)| name)
    }

    /// Returns true if every field is finite.
    pub fn is_valid(&self) -> bool {
        self.first_non_finite().is_none()
    }
}

impl fmt::Display for PortfolioRiskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.fields() {
            writeln!(f, "{:<24}{:>18.6}", name, value)?;
        }
        Ok(())
    }
}

/// What the Monte Carlo stage actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationDiagnostics {
    /// Paths simulated (0 when skipped).
    pub paths_simulated: usize,
    /// Standard normal variates drawn across all paths.
    pub normal_draws: u64,
    /// Base seed of the run; `None` when no simulation ran.
    pub seed: Option<u64>,
    /// True when the portfolio was empty or worth zero.
    pub simulation_skipped: bool,
}

/// Risk result plus simulation diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskReport {
    /// Aggregated risk figures.
    pub result: PortfolioRiskResult,
    /// Simulation bookkeeping.
    pub diagnostics: SimulationDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_and_valid() {
        let r = PortfolioRiskResult::default();
        assert!(r.fields().iter().all(|(_, v)| *v == 0.0));
        assert!(r.is_valid());
    }

    #[test]
    fn test_non_finite_detected() {
        let r = PortfolioRiskResult {
            expected_shortfall_99: f64::NAN,
            ..Default::default()
        };
        assert!(!r.is_valid());
        assert_eq!(r.first_non_finite(), Some("expected_shortfall_99"));
    }

    #[test]
    fn test_totals_round_trip() {
        let g = Greeks {
            price: 1.0,
            delta: 2.0,
            gamma: 3.0,
            vega: 4.0,
            theta: 5.0,
        };
        let r = PortfolioRiskResult::from_totals(g);
        assert_eq!(r.totals(), g);
        assert_eq!(r.value_at_risk_95, 0.0);
    }

    #[test]
    fn test_display_lists_every_field() {
        let text = PortfolioRiskResult::default().to_string();
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("value_at_risk_99"));
    }
}
