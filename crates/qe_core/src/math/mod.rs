//! Numerical building blocks.
//!
//! - [`distributions`]: Standard normal CDF and PDF
//! - [`solvers`]: Root-finding solvers (Newton-Raphson)

pub mod distributions;
pub mod solvers;
