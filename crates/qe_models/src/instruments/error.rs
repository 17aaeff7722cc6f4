//! Instrument error types.
//!
//! This module provides structured error handling for instrument
//! construction and parameter updates.

use qe_core::types::PricingError;
use thiserror::Error;

/// Instrument-related errors.
///
/// # Variants
/// - `InvalidStrike`: Strike price is non-positive or non-finite
/// - `InvalidExpiry`: Time to expiry is negative or non-finite
/// - `InvalidSteps`: Lattice step count outside `[1, 10000]`
/// - `InvalidJumpParameter`: Jump intensity or volatility out of range
/// - `EmptyAssetId`: The underlying asset id is empty
///
/// # Examples
/// ```
/// use qe_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidStrike { strike: -100.0 };
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Invalid strike price (non-positive).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid time to expiry (negative).
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Lattice step count out of range.
    #[error("Invalid binomial steps: {steps} (expected 1..=10000)")]
    InvalidSteps {
        /// The invalid step count
        steps: usize,
    },

    /// Jump parameter out of range.
    #[error("Invalid jump parameter: {name} = {value}")]
    InvalidJumpParameter {
        /// Parameter name
        name: &'static str,
        /// The invalid value
        value: f64,
    },

    /// Missing underlying asset id.
    #[error("Invalid asset id: cannot be empty")]
    EmptyAssetId,
}

impl InstrumentError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            InstrumentError::InvalidStrike { .. } => "strike",
            InstrumentError::InvalidExpiry { .. } => "time_to_expiry",
            InstrumentError::InvalidSteps { .. } => "binomial_steps",
            InstrumentError::InvalidJumpParameter { name, .. } => name,
            InstrumentError::EmptyAssetId => "asset_id",
        }
    }

    /// Converts into a [`PricingError::Validation`] naming `subject`.
    pub fn into_pricing_error(self, subject: &str) -> PricingError {
        PricingError::validation(subject, self.field(), self.to_string())
    }
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        err.into_pricing_error("instrument")
    }
}
