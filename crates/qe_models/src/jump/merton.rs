//! Merton (1976) jump-diffusion for European options.
//!
//! ## Mathematical Formulas
//!
//! V = Σₙ Pois(n; λT) · BS(S, K, rₙ, q, T, σₙ)
//!
//! Where:
//! - k = e^(μ_J + σ_J²/2) - 1 (mean relative jump size)
//! - rₙ = r - λk + n(μ_J + σ_J²/2)/T
//! - σₙ = √(σ² + n·σ_J²/T)
//!
//! The series stops once a term's probability drops below 1e-10 past the
//! Poisson mode, or the accumulated probability exceeds 0.9999 and the term
//! is below 1e-8, or `max_jumps` terms have been summed.

use qe_core::market_data::ModelInputs;
use qe_core::types::error::ensure_finite;
use qe_core::types::PricingResult;

use crate::analytical::BlackScholes;
use crate::greeks::{finite_difference, Greeks};
use crate::instruments::params::validate_terms;
use crate::instruments::{InstrumentError, OptionType};

const MODEL: &str = "merton jump-diffusion";

/// Default cap on the number of series terms.
pub const DEFAULT_MAX_JUMPS: usize = 100;

const NEGLIGIBLE_PROBABILITY: f64 = 1e-10;
const TAIL_PROBABILITY: f64 = 1e-8;
const COVERED_MASS: f64 = 0.9999;

/// Lognormal jump specification.
///
/// # Examples
/// ```
/// use qe_models::jump::JumpParameters;
///
/// let jumps = JumpParameters::new(0.5, -0.1, 0.15).unwrap();
/// assert!(jumps.mean_jump_size() < 0.0);
/// assert!(JumpParameters::new(-1.0, 0.0, 0.1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpParameters {
    /// Jump arrival rate λ per year (≥ 0).
    pub intensity: f64,
    /// Mean log jump size μ_J.
    pub mean: f64,
    /// Log jump size volatility σ_J (≥ 0).
    pub volatility: f64,
}

impl JumpParameters {
    /// Creates validated jump parameters.
    pub fn new(intensity: f64, mean: f64, volatility: f64) -> Result<Self, InstrumentError> {
        let params = Self {
            intensity,
            mean,
            volatility,
        };
        params.validate()?;
        Ok(params)
    }

    /// No jumps: the model collapses to Black-Scholes.
    pub fn none() -> Self {
        Self::default()
    }

    /// λ ≥ 0, σ_J ≥ 0, all finite.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if !(self.intensity.is_finite() && self.intensity >= 0.0) {
            return Err(InstrumentError::InvalidJumpParameter {
                name: "jump_intensity",
                value: self.intensity,
            });
        }
        if !self.mean.is_finite() {
            return Err(InstrumentError::InvalidJumpParameter {
                name: "jump_mean",
                value: self.mean,
            });
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(InstrumentError::InvalidJumpParameter {
                name: "jump_volatility",
                value: self.volatility,
            });
        }
        Ok(())
    }

    /// k = e^(μ_J + σ_J²/2) - 1.
    #[inline]
    pub fn mean_jump_size(&self) -> f64 {
        (self.mean + 0.5 * self.volatility * self.volatility).exp() - 1.0
    }
}

/// Poisson probability P(N = n) for mean `lambda_t`, evaluated in log space.
///
/// # Examples
/// ```
/// use qe_models::jump::poisson_probability;
///
/// assert_eq!(poisson_probability(0, 0.0), 1.0);
/// assert_eq!(poisson_probability(3, 0.0), 0.0);
/// assert!((poisson_probability(2, 1.5) - 1.5_f64.powi(2) / 2.0 * (-1.5_f64).exp()).abs() < 1e-15);
/// ```
pub fn poisson_probability(n: usize, lambda_t: f64) -> f64 {
    if lambda_t == 0.0 {
        return if n == 0 { 1.0 } else { 0.0 };
    }
    let log_factorial: f64 = (2..=n).map(|i| (i as f64).ln()).sum();
    (n as f64 * lambda_t.ln() - lambda_t - log_factorial).exp()
}

/// Merton jump-diffusion model.
///
/// # Examples
/// ```
/// use qe_core::market_data::ModelInputs;
/// use qe_models::analytical::BlackScholes;
/// use qe_models::instruments::OptionType;
/// use qe_models::jump::{JumpParameters, MertonJumpDiffusion};
///
/// let inputs = ModelInputs::new(100.0, 0.05, 0.2, 0.0);
/// let merton = MertonJumpDiffusion::new(JumpParameters::new(0.3, -0.1, 0.2).unwrap()).unwrap();
/// let jump_put = merton.price(inputs, OptionType::Put, 90.0, 1.0).unwrap();
/// let bs_put = BlackScholes::new(100.0, 0.05, 0.2).unwrap().price(OptionType::Put, 90.0, 1.0).unwrap();
///
/// // Downward jumps fatten the left tail
/// assert!(jump_put > bs_put);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MertonJumpDiffusion {
    jumps: JumpParameters,
    max_jumps: usize,
}

impl MertonJumpDiffusion {
    /// Creates a model with the default series cap.
    pub fn new(jumps: JumpParameters) -> PricingResult<Self> {
        jumps.validate().map_err(|e| e.into_pricing_error(MODEL))?;
        Ok(Self {
            jumps,
            max_jumps: DEFAULT_MAX_JUMPS,
        })
    }

    /// Returns a copy with a different series cap.
    pub fn with_max_jumps(mut self, max_jumps: usize) -> Self {
        self.max_jumps = max_jumps;
        self
    }

    /// Returns the jump parameters.
    pub fn jumps(&self) -> &JumpParameters {
        &self.jumps
    }

    /// Returns the series cap.
    pub fn max_jumps(&self) -> usize {
        self.max_jumps
    }

    /// Option price.
    ///
    /// T ≤ 0 returns the intrinsic value. λ = 0 reproduces Black-Scholes.
    ///
    /// # Errors
    /// - `Validation` for bad market inputs or contract terms
    /// - `Numerical` if the series sum is not finite
    pub fn price(
        &self,
        inputs: ModelInputs,
        option_type: OptionType,
        strike: f64,
        expiry: f64,
    ) -> PricingResult<f64> {
        inputs.validate(MODEL)?;
        validate_terms(strike, expiry)?;

        if expiry <= 0.0 {
            return Ok(option_type.intrinsic(inputs.spot, strike));
        }

        let lambda_t = self.jumps.intensity * expiry;
        let k = self.jumps.mean_jump_size();
        let jump_drift = self.jumps.mean + 0.5 * self.jumps.volatility * self.jumps.volatility;
        let jump_variance = self.jumps.volatility * self.jumps.volatility;

        let mut value = 0.0;
        let mut covered = 0.0;

        for n in 0..=self.max_jumps {
            let prob = poisson_probability(n, lambda_t);

            // Terms before the Poisson mode can be tiny and still be followed by large ones
            if prob < NEGLIGIBLE_PROBABILITY && n as f64 > lambda_t {
                break;
            }
            covered += prob;

            let n_f = n as f64;
            let sigma_n = (inputs.volatility * inputs.volatility + n_f * jump_variance / expiry).sqrt();
            let rate_n = inputs.rate - self.jumps.intensity * k + n_f * jump_drift / expiry;

            let term_model = BlackScholes::from_inputs(ModelInputs::new(
                inputs.spot,
                rate_n,
                sigma_n,
                inputs.dividend_yield,
            ))?;
            value += prob * term_model.raw_price(option_type, strike, expiry);

            if covered > COVERED_MASS && prob < TAIL_PROBABILITY {
                break;
            }
        }

        ensure_finite(value, MODEL, "price")
    }

    /// Price and finite-difference Greeks.
    ///
    /// Expired options return the intrinsic boundary values.
    pub fn greeks(
        &self,
        inputs: ModelInputs,
        option_type: OptionType,
        strike: f64,
        expiry: f64,
    ) -> PricingResult<Greeks> {
        inputs.validate(MODEL)?;
        validate_terms(strike, expiry)?;

        if expiry <= 0.0 {
            return Ok(Greeks::intrinsic(option_type, inputs.spot, strike));
        }

        let pricer = |bumped: ModelInputs, t: f64| self.price(bumped, option_type, strike, t);
        finite_difference::greeks(&pricer, inputs, expiry)
    }
}
