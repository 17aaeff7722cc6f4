//! Core error types.
//!
//! This module provides:
//! - `error`: The pricing error taxonomy (validation, missing market data,
//!   numerical failure, convergence failure) and solver errors
//!
//! # Re-exports
//!
//! [`PricingError`], [`PricingResult`] and [`SolverError`] are re-exported at
//! this module level.

pub mod error;

pub use error::{PricingError, PricingResult, SolverError};
