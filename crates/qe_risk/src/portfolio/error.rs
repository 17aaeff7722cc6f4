//! Portfolio error types.
//!
//! This module provides structured error types for portfolio operations
//! using `thiserror` for derivation.

use qe_core::types::PricingError;
use thiserror::Error;

const SUBJECT: &str = "portfolio";

/// Errors that can occur during portfolio operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// Position index past the end of the portfolio.
    #[error("Position index {index} out of range (len = {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of positions
        len: usize,
    },

    /// Summed quantity does not fit in `i64`.
    #[error("Quantity overflow summing positions in {asset_id}")]
    QuantityOverflow {
        /// Asset whose positions overflowed
        asset_id: String,
    },

    /// Instrument failed validation on insertion.
    #[error("Invalid instrument: {0}")]
    InvalidInstrument(#[source] PricingError),
}

impl From<PortfolioError> for PricingError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::IndexOutOfRange { index, len } => PricingError::validation(
                SUBJECT,
                "index",
                format!("{} out of range (len = {})", index, len),
            ),
            PortfolioError::QuantityOverflow { asset_id } => {
                PricingError::numerical(asset_id, "summed position quantity overflows i64")
            }
            PortfolioError::InvalidInstrument(inner) => inner,
        }
    }
}
