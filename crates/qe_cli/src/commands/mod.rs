//! CLI command implementations
//!
//! Each submodule implements a specific CLI command and returns the
//! rendered report.

pub mod check;
pub mod implied_vol;
pub mod price;
pub mod risk;
