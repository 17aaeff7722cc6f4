//! # qe_models (L2: Business Logic)
//!
//! Option pricing models and the instruments that dispatch to them.
//!
//! This crate provides:
//! - Black-Scholes closed-form prices and Greeks, plus implied volatility
//! - Cox-Ross-Rubinstein binomial lattice for European and American exercise
//! - Merton jump-diffusion as a Poisson mixture of Black-Scholes prices
//! - Finite-difference Greeks for the numerical models
//! - `Instrument` enum over European and American options
//! - Nearest-neighbour implied volatility surface
//!
//! ## Design Principles
//!
//! - **Enum-based instruments** for static dispatch, no trait objects
//! - **Pure models**: every model is a function of `ModelInputs` and the
//!   contract terms, so simulation can reprice without allocation
//! - **Fail fast**: invalid inputs are `Validation` errors and non-finite
//!   outputs are `Numerical` errors, never silently clamped
//!
//! ## Example
//!
//! ```
//! use qe_core::market_data::MarketData;
//! use qe_models::instruments::{EuropeanOption, Instrument, OptionType};
//!
//! let md = MarketData::new("AAPL", 100.0, 0.05, 0.2).unwrap();
//! let call = Instrument::European(
//!     EuropeanOption::new(OptionType::Call, 100.0, 1.0, "AAPL").unwrap(),
//! );
//!
//! let price = call.price(&md).unwrap();
//! assert!((price - 10.4506).abs() < 1e-2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod greeks;
pub mod instruments;
pub mod jump;
pub mod lattice;
pub mod surface;
