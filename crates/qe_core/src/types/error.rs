//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: The error taxonomy shared by pricing models, instruments,
//!   portfolios and the risk engine
//! - `SolverError`: Errors from root-finding solvers

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type PricingResult<T> = Result<T, PricingError>;

/// Categorised pricing and risk errors.
///
/// Separates "bad input" from "the model produced nonsense" so callers can
/// decide whether retrying with different inputs makes sense.
///
/// # Variants
/// - `Validation`: Malformed construction input or configuration
/// - `MissingMarketData`: An instrument references an unknown asset
/// - `Numerical`: A computed quantity is NaN/Inf or out of its valid range
/// - `Convergence`: An iterative procedure failed to converge
///
/// # Examples
/// ```
/// use qe_core::types::PricingError;
///
/// let err = PricingError::validation("AAPL", "spot", "must be positive, got -1");
/// assert_eq!(
///     format!("{}", err),
///     "Validation error for AAPL: spot must be positive, got -1"
/// );
/// assert!(err.is_validation());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingError {
    /// Malformed input (non-positive strike/spot, negative volatility,
    /// empty asset id, out-of-range configuration).
    #[error("Validation error for {subject}: {field} {reason}")]
    Validation {
        /// What was being validated (asset id, instrument, engine)
        subject: String,
        /// The offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// An instrument references an asset absent from the market data set.
    #[error("Missing market data for asset '{asset_id}'")]
    MissingMarketData {
        /// The asset that could not be found
        asset_id: String,
    },

    /// A computed quantity is NaN/Inf or violates a model constraint.
    #[error("Numerical error in {context}: {message}")]
    Numerical {
        /// Where the failure happened (asset, instrument, metric)
        context: String,
        /// Description of the failure
        message: String,
    },

    /// An iterative procedure exceeded its budget or stalled.
    #[error("Convergence failure after {iterations} iterations: {message}")]
    Convergence {
        /// Iterations performed before giving up
        iterations: usize,
        /// Description of the failure
        message: String,
    },
}

impl PricingError {
    /// Builds a [`PricingError::Validation`].
    pub fn validation(
        subject: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PricingError::Validation {
            subject: subject.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`PricingError::MissingMarketData`].
    pub fn missing_market_data(asset_id: impl Into<String>) -> Self {
        PricingError::MissingMarketData {
            asset_id: asset_id.into(),
        }
    }

    /// Builds a [`PricingError::Numerical`].
    pub fn numerical(context: impl Into<String>, message: impl Into<String>) -> Self {
        PricingError::Numerical {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Returns true for validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, PricingError::Validation { .. })
    }

    /// Returns true for missing market data.
    pub fn is_missing_market_data(&self) -> bool {
        matches!(self, PricingError::MissingMarketData { .. })
    }

    /// Returns true for numerical failures.
    pub fn is_numerical(&self) -> bool {
        matches!(self, PricingError::Numerical { .. })
    }

    /// Returns true for convergence failures.
    pub fn is_convergence(&self) -> bool {
        matches!(self, PricingError::Convergence { .. })
    }
}

/// Checks that `value` is finite, naming the context and metric otherwise.
///
/// # Examples
/// ```
/// use qe_core::types::error::ensure_finite;
///
/// assert_eq!(ensure_finite(1.5, "AAPL", "delta").unwrap(), 1.5);
/// assert!(ensure_finite(f64::NAN, "AAPL", "delta").unwrap_err().is_numerical());
/// ```
#[inline]
pub fn ensure_finite(value: f64, context: &str, metric: &str) -> PricingResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::numerical(
            context,
            format!("{} is not finite ({})", metric, value),
        ))
    }
}

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Failed to converge within the iteration budget
/// - `DerivativeNearZero`: Newton step would divide by (almost) zero
/// - `NumericalInstability`: Iteration produced a non-finite value
///
/// # Examples
/// ```
/// use qe_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero (division by zero risk in Newton-Raphson).
    #[error("Derivative near zero at x = {x} (iteration {iteration})")]
    DerivativeNearZero {
        /// The x value where derivative was near zero
        x: f64,
        /// Iteration at which it happened
        iteration: usize,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::MaxIterationsExceeded { iterations } => PricingError::Convergence {
                iterations,
                message: err.to_string(),
            },
            SolverError::DerivativeNearZero { iteration, .. } => PricingError::Convergence {
                iterations: iteration,
                message: err.to_string(),
            },
            SolverError::NumericalInstability(msg) => PricingError::numerical("solver", msg),
        }
    }
}
