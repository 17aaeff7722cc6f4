//! Cox-Ross-Rubinstein binomial tree.
//!
//! ## Parameters
//!
//! - dt = T / steps
//! - u = e^(σ√dt), d = 1/u
//! - p = (e^((r-q)dt) - d) / (u - d), required to lie in [0, 1]
//! - discount per step = e^(-r·dt)
//!
//! Terminal payoffs are rolled back one step at a time. American exercise
//! takes `max(continuation, intrinsic)` at every node.

use qe_core::market_data::ModelInputs;
use qe_core::types::error::ensure_finite;
use qe_core::types::{PricingError, PricingResult};

use crate::greeks::{finite_difference, Greeks};
use crate::instruments::params::{validate_steps, validate_terms, DEFAULT_BINOMIAL_STEPS};
use crate::instruments::{ExerciseStyle, OptionType};

const MODEL: &str = "binomial tree";

/// Per-step lattice quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParameters {
    /// Time step in years.
    pub dt: f64,
    /// Up factor.
    pub up: f64,
    /// Down factor (1/u).
    pub down: f64,
    /// Risk-neutral up probability.
    pub probability: f64,
    /// One-step discount factor.
    pub discount: f64,
}

/// Critical spot at one time slice of the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryPoint {
    /// Time from valuation in years.
    pub time: f64,
    /// Spot at which early exercise first becomes optimal; `None` if it
    /// never is at this time.
    pub critical_spot: Option<f64>,
}

/// Recombining CRR binomial tree.
///
/// # Examples
/// ```
/// use qe_core::market_data::ModelInputs;
/// use qe_models::instruments::{ExerciseStyle, OptionType};
/// use qe_models::lattice::BinomialTree;
///
/// let tree = BinomialTree::new(200).unwrap();
/// let inputs = ModelInputs::new(100.0, 0.05, 0.2, 0.0);
///
/// let european = tree
///     .price(inputs, OptionType::Put, 100.0, 1.0, ExerciseStyle::European)
///     .unwrap();
/// let american = tree
///     .price(inputs, OptionType::Put, 100.0, 1.0, ExerciseStyle::American)
///     .unwrap();
/// assert!(american > european);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinomialTree {
    steps: usize,
}

impl Default for BinomialTree {
    fn default() -> Self {
        Self {
            steps: DEFAULT_BINOMIAL_STEPS,
        }
    }
}

impl BinomialTree {
    /// Creates a tree with `steps` periods.
    ///
    /// # Errors
    /// `Validation` unless `1 <= steps <= 10000`.
    pub fn new(steps: usize) -> PricingResult<Self> {
        validate_steps(steps).map_err(|e| e.into_pricing_error(MODEL))?;
        Ok(Self { steps })
    }

    /// Returns the number of periods.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Computes the lattice parameters for the given inputs.
    ///
    /// # Errors
    /// `Numerical` if the risk-neutral probability falls outside [0, 1],
    /// which happens when the drift per step exceeds the volatility spread.
    pub fn parameters(&self, inputs: ModelInputs, expiry: f64) -> PricingResult<LatticeParameters> {
        let dt = expiry / self.steps as f64;
        let up = (inputs.volatility * dt.sqrt()).exp();
        let down = 1.0 / up;
        let growth = ((inputs.rate - inputs.dividend_yield) * dt).exp();
        let probability = (growth - down) / (up - down);

        if !(0.0..=1.0).contains(&probability) {
            return Err(PricingError::numerical(
                MODEL,
                format!(
                    "risk-neutral probability {} outside [0, 1] (dt = {}, u = {}, d = {})",
                    probability, dt, up, down
                ),
            ));
        }

        Ok(LatticeParameters {
            dt,
            up,
            down,
            probability,
            discount: (-inputs.rate * dt).exp(),
        })
    }

    /// Option price.
    ///
    /// T ≤ 0 or σ ≤ 0 returns the intrinsic value.
    ///
    /// # Errors
    /// - `Validation` for bad market inputs or contract terms
    /// - `Numerical` for an invalid probability or a non-finite result
    pub fn price(
        &self,
        inputs: ModelInputs,
        option_type: OptionType,
        strike: f64,
        expiry: f64,
        style: ExerciseStyle,
    ) -> PricingResult<f64> {
        inputs.validate(MODEL)?;
        validate_terms(strike, expiry)?;

        if expiry <= 0.0 || inputs.volatility <= 0.0 {
            return Ok(option_type.intrinsic(inputs.spot, strike));
        }

        let params = self.parameters(inputs, expiry)?;
        let value = self.roll_back(inputs.spot, &params, option_type, strike, style, |_, _| {});
        ensure_finite(value, MODEL, "price")
    }

    /// Price and finite-difference Greeks.
    ///
    /// See [`finite_difference`] for the bump sizes. Expired or
    /// zero-volatility inputs return the intrinsic boundary values.
    pub fn greeks(
        &self,
        inputs: ModelInputs,
        option_type: OptionType,
        strike: f64,
        expiry: f64,
        style: ExerciseStyle,
    ) -> PricingResult<Greeks> {
        inputs.validate(MODEL)?;
        validate_terms(strike, expiry)?;

        if expiry <= 0.0 || inputs.volatility <= 0.0 {
            return Ok(Greeks::intrinsic(option_type, inputs.spot, strike));
        }

        let pricer =
            |bumped: ModelInputs, t: f64| self.price(bumped, option_type, strike, t, style);
        finite_difference::greeks(&pricer, inputs, expiry)
    }

    /// Early-exercise boundary of the American option.
    ///
    /// Returns one point per time slice `0..steps`: for puts the highest node
    /// spot, and for calls the lowest, at which exercising beats holding.
    ///
    /// # Examples
    /// ```
    /// use qe_core::market_data::ModelInputs;
    /// use qe_models::instruments::OptionType;
    /// use qe_models::lattice::BinomialTree;
    ///
    /// let tree = BinomialTree::new(100).unwrap();
    /// let boundary = tree
    ///     .exercise_boundary(ModelInputs::new(100.0, 0.05, 0.2, 0.0), OptionType::Put, 100.0, 1.0)
    ///     .unwrap();
    /// assert_eq!(boundary.len(), 100);
    /// assert!(boundary.iter().flat_map(|p| p.critical_spot).all(|s| s < 100.0));
    /// ```
    pub fn exercise_boundary(
        &self,
        inputs: ModelInputs,
        option_type: OptionType,
        strike: f64,
        expiry: f64,
    ) -> PricingResult<Vec<BoundaryPoint>> {
        inputs.validate(MODEL)?;
        validate_terms(strike, expiry)?;
        if expiry <= 0.0 || inputs.volatility <= 0.0 {
            return Ok(Vec::new());
        }

        let params = self.parameters(inputs, expiry)?;
        let mut critical: Vec<Option<f64>> = vec![None; self.steps];

        self.roll_back(
            inputs.spot,
            &params,
            option_type,
            strike,
            ExerciseStyle::American,
            |step, node_spot| {
                let slot = &mut critical[step];
                *slot = Some(match (option_type, *slot) {
                    (OptionType::Put, Some(current)) => current.max(node_spot),
                    (OptionType::Call, Some(current)) => current.min(node_spot),
                    (_, None) => node_spot,
                });
            },
        );

        Ok(critical
            .into_iter()
            .enumerate()
            .map(|(step, critical_spot)| BoundaryPoint {
                time: step as f64 * params.dt,
                critical_spot,
            })
            .collect())
    }

    /// Backward induction. `on_exercise(step, spot)` fires at every node
    /// where early exercise strictly beats continuation.
    fn roll_back<E>(
        &self,
        spot: f64,
        params: &LatticeParameters,
        option_type: OptionType,
        strike: f64,
        style: ExerciseStyle,
        mut on_exercise: E,
    ) -> f64
    where
        E: FnMut(usize, f64),
    {
        let n = self.steps;
        let p = params.probability;
        let node_spot = |step: usize, down_moves: usize| {
            spot * params.up.powi(step as i32 - 2 * down_moves as i32)
        };

        let mut values: Vec<f64> = (0..=n)
            .map(|i| option_type.intrinsic(node_spot(n, i), strike))
            .collect();

        let american = style.allows_early_exercise();
        for step in (0..n).rev() {
            for i in 0..=step {
                let continuation = params.discount * (p * values[i] + (1.0 - p) * values[i + 1]);
                values[i] = if american {
                    let s = node_spot(step, i);
                    let exercise = option_type.intrinsic(s, strike);
                    if exercise > continuation {
                        on_exercise(step, s);
                        exercise
                    } else {
                        continuation
                    }
                } else {
                    continuation
                };
            }
        }

        values[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::BlackScholes;
    use approx::assert_relative_eq;

    fn inputs(spot: f64) -> ModelInputs {
        ModelInputs::new(spot, 0.05, 0.2, 0.0)
    }

    // ==========================================================
    // Construction Tests
    // ==========================================================

    #[test]
    fn test_step_bounds() {
        assert!(BinomialTree::new(1).is_ok());
        assert!(BinomialTree::new(10_000).is_ok());
        assert!(BinomialTree::new(0).unwrap_err().is_validation());
        assert!(BinomialTree::new(10_001).unwrap_err().is_validation());
        assert_eq!(BinomialTree::default().steps(), 100);
    }

    #[test]
    fn test_probability_out_of_range_is_numerical() {
        // Growth e^{0.5} exceeds u = e^{0.01} on a single step
        let tree = BinomialTree::new(1).unwrap();
        let err = tree
            .price(
                ModelInputs::new(100.0, 0.5, 0.01, 0.0),
                OptionType::Call,
                100.0,
                1.0,
                ExerciseStyle::European,
            )
            .unwrap_err();
        assert!(err.is_numerical());
    }

    #[test]
    fn test_parameters_are_consistent() {
        let params = BinomialTree::new(4).unwrap().parameters(inputs(100.0), 1.0).unwrap();
        assert_relative_eq!(params.dt, 0.25);
        assert_relative_eq!(params.up * params.down, 1.0, epsilon = 1e-15);
        assert!(params.probability > 0.0 && params.probability < 1.0);
    }

    // ==========================================================
    // Pricing Tests
    // ==========================================================

    #[test]
    fn test_expired_returns_intrinsic() {
        let tree = BinomialTree::default();
        let v = tree
            .price(inputs(80.0), OptionType::Put, 100.0, 0.0, ExerciseStyle::American)
            .unwrap();
        assert_eq!(v, 20.0);
        let g = tree
            .greeks(inputs(80.0), OptionType::Put, 100.0, 0.0, ExerciseStyle::American)
            .unwrap();
        assert_eq!(g.gamma, 0.0);
        assert_eq!(g.vega, 0.0);
        assert_eq!(g.theta, 0.0);
    }

    #[test]
    fn test_european_converges_to_black_scholes() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2)
            .unwrap()
            .price(OptionType::Call, 100.0, 1.0)
            .unwrap();
        let errors: Vec<f64> = [50, 100, 200]
            .iter()
            .map(|&n| {
                let v = BinomialTree::new(n)
                    .unwrap()
                    .price(inputs(100.0), OptionType::Call, 100.0, 1.0, ExerciseStyle::European)
                    .unwrap();
                (v - bs).abs()
            })
            .collect();
        assert!(errors[0] > errors[1]);
        assert!(errors[1] > errors[2]);
        assert!(errors[2] < 0.02);
    }

    #[test]
    fn test_american_call_matches_european_without_dividends() {
        let tree = BinomialTree::new(150).unwrap();
        let american = tree
            .price(inputs(100.0), OptionType::Call, 95.0, 1.0, ExerciseStyle::American)
            .unwrap();
        let european = tree
            .price(inputs(100.0), OptionType::Call, 95.0, 1.0, ExerciseStyle::European)
            .unwrap();
        assert_relative_eq!(american, european, epsilon = 1e-10);
    }

    #[test]
    fn test_deep_itm_american_put_exercises_immediately() {
        let tree = BinomialTree::default();
        let american = tree
            .price(inputs(80.0), OptionType::Put, 100.0, 1.0, ExerciseStyle::American)
            .unwrap();
        let european = BlackScholes::new(80.0, 0.05, 0.2)
            .unwrap()
            .price(OptionType::Put, 100.0, 1.0)
            .unwrap();
        assert_relative_eq!(american, 20.0, epsilon = 1e-12);
        assert!(american - european >= 0.1);
    }

    #[test]
    fn test_dividend_lowers_call_value() {
        let tree = BinomialTree::default();
        let plain = tree
            .price(inputs(100.0), OptionType::Call, 100.0, 1.0, ExerciseStyle::European)
            .unwrap();
        let with_div = tree
            .price(
                ModelInputs::new(100.0, 0.05, 0.2, 0.03),
                OptionType::Call,
                100.0,
                1.0,
                ExerciseStyle::European,
            )
            .unwrap();
        assert!(with_div < plain);
    }

    // ==========================================================
    // Greeks Tests
    // ==========================================================

    #[test]
    fn test_lattice_greeks_close_to_analytic() {
        let tree = BinomialTree::new(500).unwrap();
        let g = tree
            .greeks(inputs(100.0), OptionType::Call, 100.0, 1.0, ExerciseStyle::European)
            .unwrap();
        let bs = BlackScholes::new(100.0, 0.05, 0.2)
            .unwrap()
            .greeks(OptionType::Call, 100.0, 1.0)
            .unwrap();
        assert_relative_eq!(g.delta, bs.delta, epsilon = 5e-3);
        assert_relative_eq!(g.vega, bs.vega, epsilon = 0.5);
        assert!(g.gamma > 0.0);
        assert!(g.theta < 0.0);
    }

    #[test]
    fn test_american_put_delta_bounds() {
        let g = BinomialTree::default()
            .greeks(inputs(100.0), OptionType::Put, 100.0, 1.0, ExerciseStyle::American)
            .unwrap();
        assert!(g.delta < 0.0 && g.delta > -1.0);
    }

    // ==========================================================
    // Exercise Boundary Tests
    // ==========================================================

    #[test]
    fn test_call_without_dividend_has_no_boundary() {
        let boundary = BinomialTree::new(50)
            .unwrap()
            .exercise_boundary(inputs(100.0), OptionType::Call, 100.0, 1.0)
            .unwrap();
        assert!(boundary.iter().all(|p| p.critical_spot.is_none()));
    }

    #[test]
    fn test_put_boundary_below_strike() {
        let boundary = BinomialTree::new(100)
            .unwrap()
            .exercise_boundary(inputs(100.0), OptionType::Put, 100.0, 1.0)
            .unwrap();
        assert_relative_eq!(boundary[1].time, 0.01, epsilon = 1e-12);
        let spots: Vec<f64> = boundary.iter().filter_map(|p| p.critical_spot).collect();
        assert!(!spots.is_empty());
        assert!(spots.iter().all(|&s| s < 100.0));
    }
}
