//! Black-Scholes pricing model for European options.
//!
//! Closed-form prices and Greeks under lognormal dynamics with a continuous
//! dividend yield q.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! With T ≤ 0 or σ ≤ 0 every function returns the intrinsic boundary value.

use qe_core::market_data::ModelInputs;
use qe_core::math::distributions::{norm_cdf, norm_pdf};
use qe_core::types::error::ensure_finite;
use qe_core::types::PricingResult;

use crate::greeks::Greeks;
use crate::instruments::params::validate_terms;
use crate::instruments::OptionType;

/// Days per year used to express theta per calendar day.
pub const DAYS_PER_YEAR: f64 = 365.0;

const MODEL: &str = "black-scholes";

/// Black-Scholes model for European option pricing.
///
/// # Examples
/// ```
/// use qe_models::analytical::BlackScholes;
/// use qe_models::instruments::OptionType;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call = bs.price(OptionType::Call, 100.0, 1.0).unwrap();
/// let put = bs.price(OptionType::Put, 100.0, 1.0).unwrap();
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    volatility: f64,
    dividend_yield: f64,
}

impl BlackScholes {
    /// Creates a model without dividends.
    ///
    /// # Errors
    /// `Validation` if spot is not positive or volatility is negative.
    pub fn new(spot: f64, rate: f64, volatility: f64) -> PricingResult<Self> {
        Self::from_inputs(ModelInputs::new(spot, rate, volatility, 0.0))
    }

    /// Creates a model from validated market inputs.
    ///
    /// # Examples
    /// ```
    /// use qe_core::market_data::ModelInputs;
    /// use qe_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::from_inputs(ModelInputs::new(100.0, 0.05, 0.2, 0.02)).is_ok());
    /// assert!(BlackScholes::from_inputs(ModelInputs::new(-1.0, 0.05, 0.2, 0.0)).is_err());
    /// ```
    pub fn from_inputs(inputs: ModelInputs) -> PricingResult<Self> {
        inputs.validate(MODEL)?;
        Ok(Self {
            spot: inputs.spot,
            rate: inputs.rate,
            volatility: inputs.volatility,
            dividend_yield: inputs.dividend_yield,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Copy with a different volatility, skipping validation.
    #[inline]
    pub(crate) fn with_volatility_unchecked(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    #[inline]
    fn is_degenerate(&self, expiry: f64) -> bool {
        expiry <= 0.0 || self.volatility <= 0.0
    }

    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T).
    ///
    /// Only meaningful for T > 0 and σ > 0.
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate - self.dividend_yield + 0.5 * self.volatility * self.volatility)
            * expiry;
        ((self.spot / strike).ln() + drift) / vol_sqrt_t
    }

    /// d₂ = d₁ - σ√T.
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Option price.
    ///
    /// # Errors
    /// - `Validation` for a non-positive strike or negative expiry
    /// - `Numerical` if the result is not finite
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> PricingResult<f64> {
        validate_terms(strike, expiry)?;
        let value = self.raw_price(option_type, strike, expiry);
        ensure_finite(value, MODEL, "price")
    }

    /// Price without validation, used on the Merton mixture hot path.
    #[inline]
    pub(crate) fn raw_price(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        if self.is_degenerate(expiry) {
            return option_type.intrinsic(self.spot, strike);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        let carry = (-self.dividend_yield * expiry).exp();

        match option_type {
            OptionType::Call => {
                self.spot * carry * norm_cdf(d1) - strike * discount * norm_cdf(d2)
            }
            OptionType::Put => {
                strike * discount * norm_cdf(-d2) - self.spot * carry * norm_cdf(-d1)
            }
        }
    }

    /// Delta (∂V/∂S).
    ///
    /// - Call Delta = e^(-qT)·N(d₁)
    /// - Put Delta = e^(-qT)·(N(d₁) - 1)
    pub fn delta(&self, option_type: OptionType, strike: f64, expiry: f64) -> PricingResult<f64> {
        validate_terms(strike, expiry)?;
        if self.is_degenerate(expiry) {
            return Ok(option_type.intrinsic_delta(self.spot, strike));
        }

        let carry = (-self.dividend_yield * expiry).exp();
        let n_d1 = norm_cdf(self.d1(strike, expiry));
        let value = match option_type {
            OptionType::Call => carry * n_d1,
            OptionType::Put => carry * (n_d1 - 1.0),
        };
        ensure_finite(value, MODEL, "delta")
    }

    /// Gamma (∂²V/∂S²) = e^(-qT)·φ(d₁) / (S·σ·√T).
    ///
    /// Identical for calls and puts.
    pub fn gamma(&self, strike: f64, expiry: f64) -> PricingResult<f64> {
        validate_terms(strike, expiry)?;
        if self.is_degenerate(expiry) {
            return Ok(0.0);
        }

        let carry = (-self.dividend_yield * expiry).exp();
        let d1 = self.d1(strike, expiry);
        let value = carry * norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt());
        ensure_finite(value, MODEL, "gamma")
    }

    /// Vega (∂V/∂σ) = S·e^(-qT)·φ(d₁)·√T, per unit of volatility.
    pub fn vega(&self, strike: f64, expiry: f64) -> PricingResult<f64> {
        validate_terms(strike, expiry)?;
        if self.is_degenerate(expiry) {
            return Ok(0.0);
        }
        ensure_finite(self.raw_vega(strike, expiry), MODEL, "vega")
    }

    #[inline]
    pub(crate) fn raw_vega(&self, strike: f64, expiry: f64) -> f64 {
        let carry = (-self.dividend_yield * expiry).exp();
        self.spot * carry * norm_pdf(self.d1(strike, expiry)) * expiry.sqrt()
    }

    /// Theta per calendar day.
    ///
    /// - Call: [-(S·e^(-qT)·φ(d₁)·σ)/(2√T) - r·K·e^(-rT)·N(d₂) + q·S·e^(-qT)·N(d₁)] / 365
    /// - Put: [-(S·e^(-qT)·φ(d₁)·σ)/(2√T) + r·K·e^(-rT)·N(-d₂) - q·S·e^(-qT)·N(-d₁)] / 365
    pub fn theta(&self, option_type: OptionType, strike: f64, expiry: f64) -> PricingResult<f64> {
        validate_terms(strike, expiry)?;
        if self.is_degenerate(expiry) {
            return Ok(0.0);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        let carry = (-self.dividend_yield * expiry).exp();
        let decay = -(self.spot * carry * norm_pdf(d1) * self.volatility) / (2.0 * expiry.sqrt());

        let annual = match option_type {
            OptionType::Call => {
                decay - self.rate * strike * discount * norm_cdf(d2)
                    + self.dividend_yield * self.spot * carry * norm_cdf(d1)
            }
            OptionType::Put => {
                decay + self.rate * strike * discount * norm_cdf(-d2)
                    - self.dividend_yield * self.spot * carry * norm_cdf(-d1)
            }
        };
        ensure_finite(annual / DAYS_PER_YEAR, MODEL, "theta")
    }

    /// Rho (∂V/∂r).
    ///
    /// - Call Rho = K·T·e^(-rT)·N(d₂)
    /// - Put Rho = -K·T·e^(-rT)·N(-d₂)
    pub fn rho(&self, option_type: OptionType, strike: f64, expiry: f64) -> PricingResult<f64> {
        validate_terms(strike, expiry)?;
        if self.is_degenerate(expiry) {
            return Ok(0.0);
        }

        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        let value = match option_type {
            OptionType::Call => strike * expiry * discount * norm_cdf(d2),
            OptionType::Put => -strike * expiry * discount * norm_cdf(-d2),
        };
        ensure_finite(value, MODEL, "rho")
    }

    /// Price, delta, gamma, vega and theta in one call.
    pub fn greeks(&self, option_type: OptionType, strike: f64, expiry: f64) -> PricingResult<Greeks> {
        validate_terms(strike, expiry)?;
        if self.is_degenerate(expiry) {
            return Ok(Greeks::intrinsic(option_type, self.spot, strike));
        }
        Ok(Greeks {
            price: self.price(option_type, strike, expiry)?,
            delta: self.delta(option_type, strike, expiry)?,
            gamma: self.gamma(strike, expiry)?,
            vega: self.vega(strike, expiry)?,
            theta: self.theta(option_type, strike, expiry)?,
        })
    }
}

/// Prices with Black-Scholes directly from market inputs.
///
/// Convenience used as the pricer closure for the other models.
pub fn price_from_inputs(
    option_type: OptionType,
    inputs: ModelInputs,
    strike: f64,
    expiry: f64,
) -> PricingResult<f64> {
    BlackScholes::from_inputs(inputs)?.price(option_type, strike, expiry)
}
