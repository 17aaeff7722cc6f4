//! European option definition.

use qe_core::market_data::ModelInputs;
use qe_core::types::PricingResult;

use super::error::InstrumentError;
use super::params::{validate_steps, validate_terms, DEFAULT_BINOMIAL_STEPS};
use super::{ExerciseStyle, OptionType, PricingModel};
use crate::analytical::{black_scholes, BlackScholes};
use crate::greeks::Greeks;
use crate::jump::{JumpParameters, MertonJumpDiffusion};
use crate::lattice::BinomialTree;

/// European option: exercise only at expiry.
///
/// Priced with the model selected by [`PricingModel`]; Black-Scholes by
/// default. Lattice steps and jump parameters are carried even when the
/// active model ignores them, so switching models keeps the configuration.
///
/// # Examples
/// ```
/// use qe_core::market_data::ModelInputs;
/// use qe_models::instruments::{EuropeanOption, OptionType, PricingModel};
///
/// let mut put = EuropeanOption::new(OptionType::Put, 100.0, 1.0, "SPX").unwrap();
/// let inputs = ModelInputs::new(100.0, 0.05, 0.2, 0.0);
/// let analytic = put.price_with_inputs(inputs).unwrap();
///
/// put.set_pricing_model(PricingModel::Binomial);
/// put.set_binomial_steps(500).unwrap();
/// let lattice = put.price_with_inputs(inputs).unwrap();
/// assert!((analytic - lattice).abs() < 0.01);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EuropeanOption {
    option_type: OptionType,
    strike: f64,
    time_to_expiry: f64,
    asset_id: String,
    pricing_model: PricingModel,
    binomial_steps: usize,
    jumps: JumpParameters,
}

impl EuropeanOption {
    /// Creates a Black-Scholes priced option.
    ///
    /// # Errors
    /// `Validation` for a non-positive strike, negative expiry or empty
    /// asset id.
    pub fn new(
        option_type: OptionType,
        strike: f64,
        time_to_expiry: f64,
        asset_id: impl Into<String>,
    ) -> PricingResult<Self> {
        let option = Self {
            option_type,
            strike,
            time_to_expiry,
            asset_id: asset_id.into(),
            pricing_model: PricingModel::BlackScholes,
            binomial_steps: DEFAULT_BINOMIAL_STEPS,
            jumps: JumpParameters::none(),
        };
        option
            .validate()
            .map_err(|e| e.into_pricing_error(option.subject()))?;
        Ok(option)
    }

    /// Builder form of [`set_pricing_model`](Self::set_pricing_model).
    pub fn with_pricing_model(mut self, model: PricingModel) -> Self {
        self.pricing_model = model;
        self
    }

    /// Builder form of [`set_binomial_steps`](Self::set_binomial_steps).
    pub fn with_binomial_steps(mut self, steps: usize) -> PricingResult<Self> {
        self.set_binomial_steps(steps)?;
        Ok(self)
    }

    /// Builder form of [`set_jump_parameters`](Self::set_jump_parameters).
    pub fn with_jump_parameters(mut self, jumps: JumpParameters) -> PricingResult<Self> {
        self.set_jump_parameters(jumps)?;
        Ok(self)
    }

    /// Selects the pricing model.
    pub fn set_pricing_model(&mut self, model: PricingModel) {
        self.pricing_model = model;
    }

    /// Sets the lattice step count used by [`PricingModel::Binomial`].
    ///
    /// # Errors
    /// `Validation` unless `1 <= steps <= 10000`; the option is unchanged.
    pub fn set_binomial_steps(&mut self, steps: usize) -> PricingResult<()> {
        validate_steps(steps).map_err(|e| e.into_pricing_error(self.subject()))?;
        self.binomial_steps = steps;
        Ok(())
    }

    /// Sets the jump parameters used by [`PricingModel::MertonJumpDiffusion`].
    ///
    /// # Errors
    /// `Validation` for negative intensity or jump volatility; the option
    /// is unchanged.
    pub fn set_jump_parameters(&mut self, jumps: JumpParameters) -> PricingResult<()> {
        jumps
            .validate()
            .map_err(|e| e.into_pricing_error(self.subject()))?;
        self.jumps = jumps;
        Ok(())
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiry in years.
    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Underlying asset id.
    #[inline]
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Active pricing model.
    #[inline]
    pub fn pricing_model(&self) -> PricingModel {
        self.pricing_model
    }

    /// Lattice step count.
    #[inline]
    pub fn binomial_steps(&self) -> usize {
        self.binomial_steps
    }

    /// Jump parameters.
    #[inline]
    pub fn jump_parameters(&self) -> &JumpParameters {
        &self.jumps
    }

    /// Always [`ExerciseStyle::European`].
    #[inline]
    pub fn exercise_style(&self) -> ExerciseStyle {
        ExerciseStyle::European
    }

    /// Re-checks every contract field.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if self.asset_id.is_empty() {
            return Err(InstrumentError::EmptyAssetId);
        }
        validate_terms(self.strike, self.time_to_expiry)?;
        validate_steps(self.binomial_steps)?;
        self.jumps.validate()
    }

    /// Prices one unit with the active model.
    pub fn price_with_inputs(&self, inputs: ModelInputs) -> PricingResult<f64> {
        let (option_type, strike, expiry) = (self.option_type, self.strike, self.time_to_expiry);
        match self.pricing_model {
            PricingModel::BlackScholes => {
                black_scholes::price_from_inputs(option_type, inputs, strike, expiry)
            }
            PricingModel::Binomial => BinomialTree::new(self.binomial_steps)?.price(
                inputs,
                option_type,
                strike,
                expiry,
                ExerciseStyle::European,
            ),
            PricingModel::MertonJumpDiffusion => {
                MertonJumpDiffusion::new(self.jumps)?.price(inputs, option_type, strike, expiry)
            }
        }
    }

    /// Price and Greeks of one unit: analytic under Black-Scholes, finite
    /// differences otherwise.
    pub fn greeks_with_inputs(&self, inputs: ModelInputs) -> PricingResult<Greeks> {
        let (option_type, strike, expiry) = (self.option_type, self.strike, self.time_to_expiry);
        match self.pricing_model {
            PricingModel::BlackScholes => {
                BlackScholes::from_inputs(inputs)?.greeks(option_type, strike, expiry)
            }
            PricingModel::Binomial => BinomialTree::new(self.binomial_steps)?.greeks(
                inputs,
                option_type,
                strike,
                expiry,
                ExerciseStyle::European,
            ),
            PricingModel::MertonJumpDiffusion => {
                MertonJumpDiffusion::new(self.jumps)?.greeks(inputs, option_type, strike, expiry)
            }
        }
    }

    fn subject(&self) -> &str {
        if self.asset_id.is_empty() {
            "EuropeanOption"
        } else {
            &self.asset_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs() -> ModelInputs {
        ModelInputs::new(100.0, 0.05, 0.2, 0.0)
    }

    fn call() -> EuropeanOption {
        EuropeanOption::new(OptionType::Call, 100.0, 1.0, "AAPL").unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let option = call();
        assert_eq!(option.pricing_model(), PricingModel::BlackScholes);
        assert_eq!(option.binomial_steps(), DEFAULT_BINOMIAL_STEPS);
        assert_eq!(*option.jump_parameters(), JumpParameters::none());
        assert_eq!(option.exercise_style(), ExerciseStyle::European);
    }

    #[test]
    fn test_new_rejects_bad_terms() {
        assert!(EuropeanOption::new(OptionType::Call, 0.0, 1.0, "AAPL")
            .unwrap_err()
            .is_validation());
        assert!(EuropeanOption::new(OptionType::Call, 100.0, -1.0, "AAPL").is_err());
        assert!(EuropeanOption::new(OptionType::Call, 100.0, 1.0, "").is_err());
    }

    #[test]
    fn test_rejected_setter_leaves_option_unchanged() {
        let mut option = call();
        assert!(option.set_binomial_steps(0).is_err());
        assert!(option.set_binomial_steps(10_001).is_err());
        assert_eq!(option.binomial_steps(), DEFAULT_BINOMIAL_STEPS);

        let bad = JumpParameters {
            intensity: -1.0,
            mean: 0.0,
            volatility: 0.1,
        };
        assert!(option.set_jump_parameters(bad).unwrap_err().is_validation());
        assert_eq!(*option.jump_parameters(), JumpParameters::none());
    }

    #[test]
    fn test_models_agree_without_jumps() {
        let analytic = call().price_with_inputs(inputs()).unwrap();
        let lattice = call()
            .with_pricing_model(PricingModel::Binomial)
            .with_binomial_steps(1000)
            .unwrap()
            .price_with_inputs(inputs())
            .unwrap();
        let merton = call()
            .with_pricing_model(PricingModel::MertonJumpDiffusion)
            .price_with_inputs(inputs())
            .unwrap();

        assert_relative_eq!(analytic, 10.450584, epsilon = 1e-5);
        assert_relative_eq!(lattice, analytic, epsilon = 5e-3);
        assert_relative_eq!(merton, analytic, epsilon = 1e-10);
    }

    #[test]
    fn test_jump_parameters_change_price() {
        let jumps = JumpParameters::new(1.0, 0.0, 0.2).unwrap();
        let merton = call()
            .with_pricing_model(PricingModel::MertonJumpDiffusion)
            .with_jump_parameters(jumps)
            .unwrap();
        assert!(merton.price_with_inputs(inputs()).unwrap() > 13.0);
    }

    #[test]
    fn test_greeks_dispatch() {
        let analytic = call().greeks_with_inputs(inputs()).unwrap();
        let lattice = call()
            .with_pricing_model(PricingModel::Binomial)
            .with_binomial_steps(500)
            .unwrap()
            .greeks_with_inputs(inputs())
            .unwrap();

        assert_relative_eq!(analytic.delta, 0.636831, epsilon = 1e-5);
        assert_relative_eq!(lattice.delta, analytic.delta, epsilon = 1e-2);
        assert_relative_eq!(lattice.vega, analytic.vega, epsilon = 0.1);
        assert!(lattice.gamma > 0.0);
    }
}
