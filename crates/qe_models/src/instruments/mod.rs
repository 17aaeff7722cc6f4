//! Option instruments.
//!
//! # Architecture
//!
//! Uses enum dispatch (NOT trait objects):
//! - [`Instrument`] wraps [`EuropeanOption`] and [`AmericanOption`]
//! - Each variant prices one unit from `ModelInputs`; the enum adds market
//!   data validation and output checks shared by both
//!
//! # Examples
//!
//! ```
//! use qe_core::market_data::MarketData;
//! use qe_models::instruments::{AmericanOption, EuropeanOption, Instrument, OptionType};
//!
//! let md = MarketData::new("SPX", 100.0, 0.05, 0.2).unwrap();
//! let european = Instrument::European(
//!     EuropeanOption::new(OptionType::Put, 100.0, 1.0, "SPX").unwrap(),
//! );
//! let american = Instrument::American(
//!     AmericanOption::new(OptionType::Put, 100.0, 1.0, "SPX").unwrap(),
//! );
//!
//! assert!(american.price(&md).unwrap() > european.price(&md).unwrap());
//! assert_eq!(american.instrument_type(), "AmericanOption");
//! ```

mod american;
mod error;
mod european;
pub(crate) mod params;
mod payoff;

pub use american::AmericanOption;
pub use error::InstrumentError;
pub use european::EuropeanOption;
pub use params::{DEFAULT_BINOMIAL_STEPS, MAX_BINOMIAL_STEPS};
pub use payoff::{ExerciseStyle, OptionType};

use std::fmt;

use qe_core::market_data::{MarketData, ModelInputs};
use qe_core::types::{PricingError, PricingResult};

use crate::greeks::Greeks;

/// Model used to price a European option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PricingModel {
    /// Closed-form Black-Scholes.
    #[default]
    BlackScholes,
    /// Cox-Ross-Rubinstein lattice.
    Binomial,
    /// Merton jump-diffusion series.
    MertonJumpDiffusion,
}

impl PricingModel {
    /// Snake-case identifier, as used in scenario files.
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::BlackScholes => "black_scholes",
            PricingModel::Binomial => "binomial",
            PricingModel::MertonJumpDiffusion => "merton_jump_diffusion",
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified instrument enum for static dispatch.
///
/// Every pricing method validates the market inputs against the
/// instrument's asset id and rejects non-finite outputs. Prices are also
/// required to be non-negative.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "style", rename_all = "snake_case")
)]
pub enum Instrument {
    /// European exercise.
    European(EuropeanOption),
    /// American exercise.
    American(AmericanOption),
}

impl Instrument {
    /// Present value of one unit.
    ///
    /// # Errors
    /// - `Validation` if `market` belongs to another asset or fails
    ///   validation
    /// - `Numerical` for a non-finite or negative price
    /// - any model error
    pub fn price(&self, market: &MarketData) -> PricingResult<f64> {
        self.check_market(market)?;
        self.price_with_inputs(market.inputs())
    }

    /// Present value of one unit from raw model inputs.
    ///
    /// Used by simulation, where spot is shocked without rebuilding a
    /// [`MarketData`].
    pub fn price_with_inputs(&self, inputs: ModelInputs) -> PricingResult<f64> {
        inputs.validate(self.asset_id())?;
        let price = match self {
            Instrument::European(option) => option.price_with_inputs(inputs)?,
            Instrument::American(option) => option.price_with_inputs(inputs)?,
        };
        if !price.is_finite() || price < 0.0 {
            return Err(PricingError::numerical(
                self.asset_id(),
                format!("{} price is invalid: {}", self.instrument_type(), price),
            ));
        }
        Ok(price)
    }

    /// Price and all sensitivities of one unit.
    pub fn greeks(&self, market: &MarketData) -> PricingResult<Greeks> {
        self.check_market(market)?;
        self.greeks_with_inputs(market.inputs())
    }

    /// Price and all sensitivities of one unit from raw model inputs.
    pub fn greeks_with_inputs(&self, inputs: ModelInputs) -> PricingResult<Greeks> {
        inputs.validate(self.asset_id())?;
        let greeks = match self {
            Instrument::European(option) => option.greeks_with_inputs(inputs)?,
            Instrument::American(option) => option.greeks_with_inputs(inputs)?,
        };
        if let Some(metric) = greeks.first_non_finite() {
            return Err(PricingError::numerical(
                self.asset_id(),
                format!("{} {} is not finite", self.instrument_type(), metric),
            ));
        }
        if greeks.price < 0.0 {
            return Err(PricingError::numerical(
                self.asset_id(),
                format!("{} price is negative: {}", self.instrument_type(), greeks.price),
            ));
        }
        Ok(greeks)
    }

    /// ∂V/∂S of one unit.
    pub fn delta(&self, market: &MarketData) -> PricingResult<f64> {
        self.greeks(market).map(|g| g.delta)
    }

    /// ∂²V/∂S² of one unit.
    pub fn gamma(&self, market: &MarketData) -> PricingResult<f64> {
        self.greeks(market).map(|g| g.gamma)
    }

    /// ∂V/∂σ of one unit.
    pub fn vega(&self, market: &MarketData) -> PricingResult<f64> {
        self.greeks(market).map(|g| g.vega)
    }

    /// Per-day time decay of one unit.
    pub fn theta(&self, market: &MarketData) -> PricingResult<f64> {
        self.greeks(market).map(|g| g.theta)
    }

    /// Underlying asset id.
    #[inline]
    pub fn asset_id(&self) -> &str {
        match self {
            Instrument::European(option) => option.asset_id(),
            Instrument::American(option) => option.asset_id(),
        }
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        match self {
            Instrument::European(option) => option.option_type(),
            Instrument::American(option) => option.option_type(),
        }
    }

    /// Strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        match self {
            Instrument::European(option) => option.strike(),
            Instrument::American(option) => option.strike(),
        }
    }

    /// Time to expiry in years.
    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        match self {
            Instrument::European(option) => option.time_to_expiry(),
            Instrument::American(option) => option.time_to_expiry(),
        }
    }

    /// Exercise style of the variant.
    #[inline]
    pub fn exercise_style(&self) -> ExerciseStyle {
        match self {
            Instrument::European(option) => option.exercise_style(),
            Instrument::American(option) => option.exercise_style(),
        }
    }

    /// Model the instrument is priced with.
    #[inline]
    pub fn pricing_model(&self) -> PricingModel {
        match self {
            Instrument::European(option) => option.pricing_model(),
            Instrument::American(option) => option.pricing_model(),
        }
    }

    /// Type name: `"EuropeanOption"` or `"AmericanOption"`.
    #[inline]
    pub fn instrument_type(&self) -> &'static str {
        match self {
            Instrument::European(_) => "EuropeanOption",
            Instrument::American(_) => "AmericanOption",
        }
    }

    /// Payoff if exercised immediately at `spot`.
    #[inline]
    pub fn intrinsic_value(&self, spot: f64) -> f64 {
        self.option_type().intrinsic(spot, self.strike())
    }

    /// Re-checks every contract field.
    ///
    /// # Errors
    /// `Validation` naming the instrument type and the offending field.
    pub fn validate(&self) -> PricingResult<()> {
        let result = match self {
            Instrument::European(option) => option.validate(),
            Instrument::American(option) => option.validate(),
        };
        result.map_err(|e| e.into_pricing_error(self.instrument_type()))
    }

    /// Returns true if [`validate`](Self::validate) passes.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn check_market(&self, market: &MarketData) -> PricingResult<()> {
        if market.asset_id() != self.asset_id() {
            return Err(PricingError::validation(
                self.asset_id(),
                "asset_id",
                format!("market data is for '{}'", market.asset_id()),
            ));
        }
        market.validate()
    }
}

impl From<EuropeanOption> for Instrument {
    fn from(option: EuropeanOption) -> Self {
        Instrument::European(option)
    }
}

impl From<AmericanOption> for Instrument {
    fn from(option: AmericanOption) -> Self {
        Instrument::American(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market() -> MarketData {
        MarketData::new("AAPL", 100.0, 0.05, 0.2).unwrap()
    }

    fn european(option_type: OptionType) -> Instrument {
        EuropeanOption::new(option_type, 100.0, 1.0, "AAPL")
            .unwrap()
            .into()
    }

    // ==========================================================
    // Pricing Dispatch
    // ==========================================================

    #[test]
    fn test_atm_call_reference_values() {
        let call = european(OptionType::Call);
        let md = market();
        assert_relative_eq!(call.price(&md).unwrap(), 10.4506, epsilon = 1e-4);
        assert_relative_eq!(call.delta(&md).unwrap(), 0.6368, epsilon = 1e-4);
        assert_relative_eq!(call.gamma(&md).unwrap(), 0.0188, epsilon = 1e-4);
        assert_relative_eq!(call.vega(&md).unwrap(), 37.5245, epsilon = 1e-3);
        assert!(call.theta(&md).unwrap() < 0.0);
    }

    #[test]
    fn test_atm_put_reference_values() {
        let put = european(OptionType::Put);
        let md = market();
        assert_relative_eq!(put.price(&md).unwrap(), 5.5735, epsilon = 1e-4);
        assert_relative_eq!(put.delta(&md).unwrap(), -0.3632, epsilon = 1e-4);
    }

    #[test]
    fn test_expired_is_intrinsic() {
        let call: Instrument = EuropeanOption::new(OptionType::Call, 90.0, 0.0, "AAPL")
            .unwrap()
            .into();
        let g = call.greeks(&market()).unwrap();
        assert_eq!(g.price, 10.0);
        assert_eq!(g.delta, 1.0);
        assert_eq!((g.gamma, g.vega, g.theta), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_greeks_matches_individual_methods() {
        let put: Instrument = AmericanOption::new(OptionType::Put, 100.0, 1.0, "AAPL")
            .unwrap()
            .into();
        let md = market();
        let g = put.greeks(&md).unwrap();
        assert_eq!(g.price, put.price(&md).unwrap());
        assert_eq!(g.delta, put.delta(&md).unwrap());
        assert_eq!(g.vega, put.vega(&md).unwrap());
    }

    // ==========================================================
    // Market Data Checks
    // ==========================================================

    #[test]
    fn test_rejects_market_for_other_asset() {
        let other = MarketData::new("MSFT", 100.0, 0.05, 0.2).unwrap();
        let err = european(OptionType::Call).price(&other).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("MSFT"));
    }

    #[test]
    fn test_invalid_inputs_name_the_asset() {
        let err = european(OptionType::Call)
            .price_with_inputs(ModelInputs::new(-1.0, 0.05, 0.2, 0.0))
            .unwrap_err();
        match err {
            PricingError::Validation { subject, field, .. } => {
                assert_eq!(subject, "AAPL");
                assert_eq!(field, "spot");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    // ==========================================================
    // Accessors
    // ==========================================================

    #[test]
    fn test_accessors() {
        let call = european(OptionType::Call);
        assert_eq!(call.asset_id(), "AAPL");
        assert_eq!(call.option_type(), OptionType::Call);
        assert_eq!(call.strike(), 100.0);
        assert_eq!(call.time_to_expiry(), 1.0);
        assert_eq!(call.exercise_style(), ExerciseStyle::European);
        assert_eq!(call.pricing_model(), PricingModel::BlackScholes);
        assert_eq!(call.instrument_type(), "EuropeanOption");
        assert_eq!(call.intrinsic_value(112.5), 12.5);
        assert!(call.is_valid());
    }

    #[test]
    fn test_american_reports_lattice_model() {
        let put: Instrument = AmericanOption::new(OptionType::Put, 100.0, 1.0, "AAPL")
            .unwrap()
            .into();
        assert_eq!(put.pricing_model(), PricingModel::Binomial);
        assert_eq!(put.exercise_style(), ExerciseStyle::American);
        assert_eq!(put.intrinsic_value(80.0), 20.0);
    }

    #[test]
    fn test_pricing_model_display() {
        assert_eq!(PricingModel::default(), PricingModel::BlackScholes);
        assert_eq!(PricingModel::MertonJumpDiffusion.to_string(), "merton_jump_diffusion");
    }
}
