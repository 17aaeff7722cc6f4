//! # qe_core: Foundation Layer for the QE Risk Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! qe_core is the bottom layer of the workspace, providing:
//! - The error taxonomy shared by every crate (`types::error`)
//! - Standard normal distribution functions (`math::distributions`)
//! - Root-finding solvers used for implied volatility (`math::solvers`)
//! - Validated market data records and their manager (`market_data`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other qe_* crates, with minimal external dependencies:
//! - num-traits: Traits for the generic solvers
//! - libm: `erf` for the normal CDF
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use qe_core::market_data::MarketData;
//! use qe_core::math::distributions::norm_cdf;
//!
//! let md = MarketData::new("AAPL", 100.0, 0.05, 0.2).unwrap();
//! assert_eq!(md.asset_id(), "AAPL");
//!
//! // Symmetry of the standard normal CDF
//! let z = 1.25_f64;
//! assert!((norm_cdf(z) + norm_cdf(-z) - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `MarketData` and `PricingError`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
