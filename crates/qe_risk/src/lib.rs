//! # qe_risk (L3: Application)
//!
//! Portfolio aggregation and Monte Carlo market risk.
//!
//! This crate provides:
//! - [`Portfolio`]: ordered positions of (instrument, signed quantity)
//! - [`RiskEngine`]: aggregated PV and Greeks, plus VaR and expected
//!   shortfall at 95% and 99% from a one-step GBM simulation
//! - Seeded, chunked RNG streams so results are reproducible and
//!   independent of thread count
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              qe_risk (L3)               │
//! ├─────────────────────────────────────────┤
//! │  portfolio/  - Position, Portfolio      │
//! │  engine/     - RiskEngine, metrics      │
//! │  rng         - RiskRng, stream seeds    │
//! │  parallel/   - Rayon chunking           │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │             qe_models (L2)              │
//! │  Black-Scholes, CRR lattice, Merton     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Logging
//!
//! The engine emits `tracing` events (`debug!` per stage, one `info!`
//! summary per calculation) inside a `portfolio_risk` span. Installing a
//! subscriber is left to the binary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod engine;
pub mod parallel;
pub mod portfolio;
pub mod rng;

pub use engine::{PortfolioRiskResult, RiskEngine, RiskEngineConfig, RiskReport};
pub use parallel::ParallelConfig;
pub use portfolio::{Portfolio, PortfolioError, Position};
