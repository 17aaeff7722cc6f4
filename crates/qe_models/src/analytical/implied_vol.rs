//! Implied volatility by Newton-Raphson on the Black-Scholes price.
//!
//! Iterates σ ← σ − (BS(σ) − P) / vega(σ), clamping σ into
//! `[MIN_VOLATILITY, MAX_VOLATILITY]` after every step.

use qe_core::market_data::ModelInputs;
use qe_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
use qe_core::types::{PricingError, PricingResult};

use super::black_scholes::BlackScholes;
use crate::instruments::params::validate_strike;
use crate::instruments::OptionType;

/// Lower clamp for volatility iterates.
pub const MIN_VOLATILITY: f64 = 0.001;

/// Upper clamp for volatility iterates.
pub const MAX_VOLATILITY: f64 = 5.0;

/// Vega below which a Newton step is refused.
pub const MIN_VEGA: f64 = 1e-10;

const SUBJECT: &str = "implied volatility";

/// Newton-Raphson implied volatility solver.
///
/// # Examples
/// ```
/// use qe_core::market_data::ModelInputs;
/// use qe_models::analytical::{BlackScholes, ImpliedVolatility};
/// use qe_models::instruments::OptionType;
///
/// let inputs = ModelInputs::new(100.0, 0.05, 0.0, 0.0);
/// let price = BlackScholes::new(100.0, 0.05, 0.3)
///     .unwrap()
///     .price(OptionType::Call, 110.0, 0.5)
///     .unwrap();
///
/// let vol = ImpliedVolatility::default()
///     .solve(OptionType::Call, price, inputs, 110.0, 0.5)
///     .unwrap();
/// assert!((vol - 0.3).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolatility {
    initial_guess: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl Default for ImpliedVolatility {
    /// Initial guess 0.2, price tolerance 1e-6, 100 iterations.
    fn default() -> Self {
        Self {
            initial_guess: 0.2,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl ImpliedVolatility {
    /// Creates a solver.
    ///
    /// # Errors
    /// `Validation` if the guess lies outside the clamp range, the tolerance
    /// is not positive, or the iteration budget is zero.
    pub fn new(initial_guess: f64, tolerance: f64, max_iterations: usize) -> PricingResult<Self> {
        if !(MIN_VOLATILITY..=MAX_VOLATILITY).contains(&initial_guess) {
            return Err(PricingError::validation(
                SUBJECT,
                "initial_guess",
                format!(
                    "must lie in [{}, {}], got {}",
                    MIN_VOLATILITY, MAX_VOLATILITY, initial_guess
                ),
            ));
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(PricingError::validation(
                SUBJECT,
                "tolerance",
                format!("must be positive, got {}", tolerance),
            ));
        }
        if max_iterations == 0 {
            return Err(PricingError::validation(
                SUBJECT,
                "max_iterations",
                "must be positive",
            ));
        }
        Ok(Self {
            initial_guess,
            tolerance,
            max_iterations,
        })
    }

    /// Returns the starting volatility.
    pub fn initial_guess(&self) -> f64 {
        self.initial_guess
    }

    /// Returns the price tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the iteration budget.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// No-arbitrage price bounds `(lower, upper)` for the option.
    ///
    /// Calls: `[max(0, S·e^(-qT) - K·e^(-rT)), S·e^(-qT))`.
    /// Puts: `[max(0, K·e^(-rT) - S·e^(-qT)), K·e^(-rT))`.
    pub fn price_bounds(
        option_type: OptionType,
        inputs: ModelInputs,
        strike: f64,
        expiry: f64,
    ) -> (f64, f64) {
        let forward_spot = inputs.spot * (-inputs.dividend_yield * expiry).exp();
        let discounted_strike = strike * (-inputs.rate * expiry).exp();
        match option_type {
            OptionType::Call => ((forward_spot - discounted_strike).max(0.0), forward_spot),
            OptionType::Put => ((discounted_strike - forward_spot).max(0.0), discounted_strike),
        }
    }

    /// Solves for the volatility reproducing `market_price`.
    ///
    /// `inputs.volatility` is ignored.
    ///
    /// # Errors
    /// - `Validation` for T ≤ 0, bad market inputs, or a price outside the
    ///   no-arbitrage bounds
    /// - `Convergence` if vega collapses below 1e-10 or the iteration budget
    ///   runs out
    pub fn solve(
        &self,
        option_type: OptionType,
        market_price: f64,
        inputs: ModelInputs,
        strike: f64,
        expiry: f64,
    ) -> PricingResult<f64> {
        validate_strike(strike).map_err(|e| e.into_pricing_error(SUBJECT))?;
        if !(expiry.is_finite() && expiry > 0.0) {
            return Err(PricingError::validation(
                SUBJECT,
                "time_to_expiry",
                format!("must be positive, got {}", expiry),
            ));
        }
        let model = BlackScholes::from_inputs(inputs.with_volatility(self.initial_guess))?;

        let (lower, upper) = Self::price_bounds(option_type, inputs, strike, expiry);
        if !market_price.is_finite() || market_price < lower {
            return Err(PricingError::validation(
                SUBJECT,
                "market_price",
                format!("{} is below the no-arbitrage bound {}", market_price, lower),
            ));
        }
        if market_price >= upper {
            return Err(PricingError::validation(
                SUBJECT,
                "market_price",
                format!("{} is at or above the upper bound {}", market_price, upper),
            ));
        }

        let config = SolverConfig::new(self.tolerance, self.max_iterations)
            .with_min_derivative(MIN_VEGA);
        let solver = NewtonRaphsonSolver::new(config);

        let objective = |sigma: f64| {
            model
                .with_volatility_unchecked(sigma)
                .raw_price(option_type, strike, expiry)
                - market_price
        };
        let vega = |sigma: f64| model.with_volatility_unchecked(sigma).raw_vega(strike, expiry);

        let sigma = solver.find_root_projected(objective, vega, self.initial_guess, |sigma| {
            sigma.clamp(MIN_VOLATILITY, MAX_VOLATILITY)
        })?;
        Ok(sigma)
    }
}

/// Implied volatility with default solver settings.
pub fn implied_volatility(
    option_type: OptionType,
    market_price: f64,
    inputs: ModelInputs,
    strike: f64,
    expiry: f64,
) -> PricingResult<f64> {
    ImpliedVolatility::default().solve(option_type, market_price, inputs, strike, expiry)
}
