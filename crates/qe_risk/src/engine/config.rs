//! Risk engine configuration.

use qe_core::types::{PricingError, PricingResult};

use crate::parallel::ParallelConfig;

const SUBJECT: &str = "risk engine";

/// Monte Carlo paths used when none are configured.
pub const DEFAULT_VAR_SIMULATIONS: usize = 10_000;

/// Upper bound on Monte Carlo paths.
pub const MAX_VAR_SIMULATIONS: usize = 1_000_000;

/// Trading days per year; the horizon is converted to years with it.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Longest accepted VaR horizon, in trading days.
pub const MAX_TIME_HORIZON_DAYS: f64 = 252.0;

/// Seed used when `use_fixed_seed` is set and no seed is given.
pub const DEFAULT_SEED: u64 = 42;

/// Confidence levels at which VaR and ES are reported.
pub const CONFIDENCE_LEVELS: [f64; 2] = [0.95, 0.99];

/// Configuration for [`RiskEngine`](super::RiskEngine).
///
/// # Examples
/// ```
/// use qe_risk::engine::RiskEngineConfig;
///
/// let config = RiskEngineConfig {
///     var_simulations: 50_000,
///     use_fixed_seed: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.horizon_years(), 1.0 / 252.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RiskEngineConfig {
    /// Monte Carlo paths, in `[1, 1_000_000]`.
    pub var_simulations: usize,
    /// VaR horizon in trading days, in `(0, 252]`.
    pub time_horizon_days: f64,
    /// Base seed used when `use_fixed_seed` is true.
    pub seed: u64,
    /// Reuse `seed` on every call instead of drawing a fresh one.
    pub use_fixed_seed: bool,
    /// Chunking and threading of the path loop.
    pub parallel: ParallelConfig,
}

impl Default for RiskEngineConfig {
    fn default() -> Self {
        Self {
            var_simulations: DEFAULT_VAR_SIMULATIONS,
            time_horizon_days: 1.0,
            seed: DEFAULT_SEED,
            use_fixed_seed: false,
            parallel: ParallelConfig::default(),
        }
    }
}

impl RiskEngineConfig {
    /// Checks every field.
    ///
    /// # Errors
    /// `Validation` naming the first out-of-range field.
    pub fn validate(&self) -> PricingResult<()> {
        validate_simulations(self.var_simulations)?;
        validate_horizon(self.time_horizon_days)?;
        if self.parallel.batch_size == 0 {
            return Err(PricingError::validation(
                SUBJECT,
                "batch_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Horizon in years (`time_horizon_days / 252`).
    #[inline]
    pub fn horizon_years(&self) -> f64 {
        self.time_horizon_days / TRADING_DAYS_PER_YEAR
    }
}

pub(crate) fn validate_simulations(n: usize) -> PricingResult<()> {
    if (1..=MAX_VAR_SIMULATIONS).contains(&n) {
        Ok(())
    } else {
        Err(PricingError::validation(
            SUBJECT,
            "var_simulations",
            format!("must lie in [1, {}], got {}", MAX_VAR_SIMULATIONS, n),
        ))
    }
}

pub(crate) fn validate_horizon(days: f64) -> PricingResult<()> {
    if days.is_finite() && days > 0.0 && days <= MAX_TIME_HORIZON_DAYS {
        Ok(())
    } else {
        Err(PricingError::validation(
            SUBJECT,
            "time_horizon_days",
            format!("must lie in (0, {}], got {}", MAX_TIME_HORIZON_DAYS, days),
        ))
    }
}
