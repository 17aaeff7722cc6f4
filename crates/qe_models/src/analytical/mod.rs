//! Analytical pricing formulas for European options.
//!
//! This module provides:
//! - Black-Scholes prices and Greeks (Delta, Gamma, Vega, Theta, Rho) with a
//!   continuous dividend yield
//! - Implied volatility by Newton-Raphson on the Black-Scholes price
//!
//! ## Design Principles
//!
//! - **Eager validation**: bad inputs are `Validation` errors before any
//!   arithmetic runs
//! - **Finiteness checks**: every public output is checked before return
//! - **Numerical Stability**: uses the erfc-based CDF from `qe_core`

pub mod black_scholes;
pub mod implied_vol;

pub use black_scholes::BlackScholes;
pub use implied_vol::{implied_volatility, ImpliedVolatility};
