//! Validated per-asset market quote.

use crate::types::{PricingError, PricingResult};

/// Numeric market inputs consumed by the pricing models.
///
/// A `Copy` view of [`MarketData`] without the asset id, so that repricing
/// inside a simulation never touches the heap.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelInputs {
    /// Spot price (S)
    pub spot: f64,
    /// Continuously compounded risk-free rate (r)
    pub rate: f64,
    /// Volatility (σ)
    pub volatility: f64,
    /// Continuous dividend yield (q)
    pub dividend_yield: f64,
}

impl ModelInputs {
    /// Creates model inputs without validation.
    #[inline]
    pub fn new(spot: f64, rate: f64, volatility: f64, dividend_yield: f64) -> Self {
        Self {
            spot,
            rate,
            volatility,
            dividend_yield,
        }
    }

    /// Returns a copy with the spot replaced.
    #[inline]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    /// Returns a copy with the volatility replaced.
    #[inline]
    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    /// Checks the inputs a pricing model relies on.
    ///
    /// Spot must be positive and finite, volatility non-negative and finite,
    /// rate and dividend yield finite and the yield non-negative. `subject`
    /// names the asset or instrument in the resulting error.
    pub fn validate(&self, subject: &str) -> PricingResult<()> {
        if !self.spot.is_finite() {
            return Err(PricingError::validation(
                subject,
                "spot",
                format!("must be finite, got {}", self.spot),
            ));
        }
        if self.spot <= 0.0 {
            return Err(PricingError::validation(
                subject,
                "spot",
                format!("must be positive, got {}", self.spot),
            ));
        }
        if !self.rate.is_finite() {
            return Err(PricingError::validation(
                subject,
                "rate",
                format!("must be finite, got {}", self.rate),
            ));
        }
        if !self.volatility.is_finite() {
            return Err(PricingError::validation(
                subject,
                "volatility",
                format!("must be finite, got {}", self.volatility),
            ));
        }
        if self.volatility < 0.0 {
            return Err(PricingError::validation(
                subject,
                "volatility",
                format!("cannot be negative, got {}", self.volatility),
            ));
        }
        if !self.dividend_yield.is_finite() {
            return Err(PricingError::validation(
                subject,
                "dividend_yield",
                format!("must be finite, got {}", self.dividend_yield),
            ));
        }
        if self.dividend_yield < 0.0 {
            return Err(PricingError::validation(
                subject,
                "dividend_yield",
                format!("cannot be negative, got {}", self.dividend_yield),
            ));
        }
        Ok(())
    }
}

/// Market quote for a single asset.
///
/// Validated eagerly on construction: the asset id must be non-empty, spot
/// positive, volatility and dividend yield non-negative, and every numeric
/// field finite.
///
/// # Examples
/// ```
/// use qe_core::market_data::MarketData;
///
/// let md = MarketData::new("AAPL", 100.0, 0.05, 0.2).unwrap();
/// assert_eq!(md.dividend_yield(), 0.0);
///
/// let err = MarketData::new("AAPL", -1.0, 0.05, 0.2).unwrap_err();
/// assert!(err.to_string().contains("AAPL"));
/// assert!(err.to_string().contains("spot"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketData {
    asset_id: String,
    spot: f64,
    rate: f64,
    volatility: f64,
    dividend_yield: f64,
}

impl MarketData {
    /// Creates a validated quote with zero dividend yield.
    ///
    /// # Errors
    /// `PricingError::Validation` naming the asset and offending field.
    pub fn new(
        asset_id: impl Into<String>,
        spot: f64,
        rate: f64,
        volatility: f64,
    ) -> PricingResult<Self> {
        Self::with_dividend_yield(asset_id, spot, rate, volatility, 0.0)
    }

    /// Creates a validated quote with a continuous dividend yield.
    pub fn with_dividend_yield(
        asset_id: impl Into<String>,
        spot: f64,
        rate: f64,
        volatility: f64,
        dividend_yield: f64,
    ) -> PricingResult<Self> {
        let md = Self {
            asset_id: asset_id.into(),
            spot,
            rate,
            volatility,
            dividend_yield,
        };
        md.validate()?;
        Ok(md)
    }

    /// Re-validates every field.
    pub fn validate(&self) -> PricingResult<()> {
        if self.asset_id.trim().is_empty() {
            return Err(PricingError::validation(
                "market data",
                "asset_id",
                "cannot be empty",
            ));
        }
        self.inputs().validate(&self.asset_id)
    }

    /// Returns a validated copy with a different spot.
    pub fn with_spot(&self, spot: f64) -> PricingResult<Self> {
        let md = Self {
            spot,
            ..self.clone()
        };
        md.validate()?;
        Ok(md)
    }

    /// Returns the numeric inputs for the pricing models.
    #[inline]
    pub fn inputs(&self) -> ModelInputs {
        ModelInputs {
            spot: self.spot,
            rate: self.rate,
            volatility: self.volatility,
            dividend_yield: self.dividend_yield,
        }
    }

    /// Returns the asset identifier.
    #[inline]
    pub fn asset_id(&self) -> &str {
        &self.asset_id
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

    /// Returns the continuous dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }
}
