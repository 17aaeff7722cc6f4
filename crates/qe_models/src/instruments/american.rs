//! American option definition.

use qe_core::market_data::ModelInputs;
use qe_core::types::PricingResult;

use super::error::InstrumentError;
use super::params::{validate_steps, validate_terms, DEFAULT_BINOMIAL_STEPS};
use super::{ExerciseStyle, OptionType, PricingModel};
use crate::greeks::Greeks;
use crate::lattice::binomial::BoundaryPoint;
use crate::lattice::BinomialTree;

/// American option: exercisable at any time up to expiry.
///
/// Always priced on the binomial lattice.
///
/// # Examples
/// ```
/// use qe_core::market_data::ModelInputs;
/// use qe_models::instruments::{AmericanOption, OptionType};
///
/// let put = AmericanOption::new(OptionType::Put, 100.0, 1.0, "SPX").unwrap();
/// let value = put.price_with_inputs(ModelInputs::new(80.0, 0.05, 0.2, 0.0)).unwrap();
/// assert!(value >= 20.0 - 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmericanOption {
    option_type: OptionType,
    strike: f64,
    time_to_expiry: f64,
    asset_id: String,
    binomial_steps: usize,
}

impl AmericanOption {
    /// Creates an option on a 100-step lattice.
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
            binomial_steps: DEFAULT_BINOMIAL_STEPS,
        };
        option
            .validate()
            .map_err(|e| e.into_pricing_error(option.subject()))?;
        Ok(option)
    }

    /// Builder form of [`set_binomial_steps`](Self::set_binomial_steps).
    pub fn with_binomial_steps(mut self, steps: usize) -> PricingResult<Self> {
        self.set_binomial_steps(steps)?;
        Ok(self)
    }

    /// Sets the lattice step count.
    ///
    /// # Errors
    /// `Validation` unless `1 <= steps <= 10000`; the option is unchanged.
    pub fn set_binomial_steps(&mut self, steps: usize) -> PricingResult<()> {
        validate_steps(steps).map_err(|e| e.into_pricing_error(self.subject()))?;
        self.binomial_steps = steps;
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

    /// Lattice step count.
    #[inline]
    pub fn binomial_steps(&self) -> usize {
        self.binomial_steps
    }

    /// Always [`PricingModel::Binomial`].
    #[inline]
    pub fn pricing_model(&self) -> PricingModel {
        PricingModel::Binomial
    }

    /// Always [`ExerciseStyle::American`].
    #[inline]
    pub fn exercise_style(&self) -> ExerciseStyle {
        ExerciseStyle::American
    }

    /// Re-checks every contract field.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if self.asset_id.is_empty() {
            return Err(InstrumentError::EmptyAssetId);
        }
        validate_terms(self.strike, self.time_to_expiry)?;
        validate_steps(self.binomial_steps)
    }

    /// Prices one unit on the lattice.
    pub fn price_with_inputs(&self, inputs: ModelInputs) -> PricingResult<f64> {
        self.tree()?.price(
            inputs,
            self.option_type,
            self.strike,
            self.time_to_expiry,
            ExerciseStyle::American,
        )
    }

    /// Price and finite-difference Greeks of one unit.
    pub fn greeks_with_inputs(&self, inputs: ModelInputs) -> PricingResult<Greeks> {
        self.tree()?.greeks(
            inputs,
            self.option_type,
            self.strike,
            self.time_to_expiry,
            ExerciseStyle::American,
        )
    }

    /// Early-exercise boundary, one point per lattice step.
    pub fn exercise_boundary(&self, inputs: ModelInputs) -> PricingResult<Vec<BoundaryPoint>> {
        self.tree()?
            .exercise_boundary(inputs, self.option_type, self.strike, self.time_to_expiry)
    }

    fn tree(&self) -> PricingResult<BinomialTree> {
        BinomialTree::new(self.binomial_steps)
    }

    fn subject(&self) -> &str {
        if self.asset_id.is_empty() {
            "AmericanOption"
        } else {
            &self.asset_id
        }
    }
}
