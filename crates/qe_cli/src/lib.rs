//! Command-line front end for the QE risk engine.
//!
//! The `qe-risk` binary loads a TOML scenario (market data, positions and
//! engine settings), runs pricing or a portfolio risk calculation and
//! prints a table or JSON report.
//!
//! # Commands
//!
//! - `qe-risk risk --scenario <file>`: aggregated Greeks, VaR and ES
//! - `qe-risk price --scenario <file>`: per-position price and Greeks
//! - `qe-risk implied-vol ...`: Black-Scholes implied volatility
//! - `qe-risk check --scenario <file>`: validate a scenario without pricing
//!
//! Commands return their report as a `String`; `main` prints it and owns the
//! tracing subscriber.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod scenario;

pub use error::{CliError, Result};

// Re-export engine crates for integration
pub use qe_core;
pub use qe_models;
pub use qe_risk;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
