//! Market data records for pricing and risk.
//!
//! # Components
//!
//! - [`MarketData`]: A validated quote (spot, rate, volatility, dividend
//!   yield) for one asset
//! - [`ModelInputs`]: The `Copy` numeric view of a quote used on pricing hot
//!   paths
//! - [`MarketDataManager`]: An asset id keyed store with add/update/remove
//!   semantics
//!
//! # Example
//!
//! ```
//! use qe_core::market_data::{MarketData, MarketDataManager};
//!
//! let mut manager = MarketDataManager::new();
//! manager.add(MarketData::new("AAPL", 100.0, 0.05, 0.2).unwrap()).unwrap();
//!
//! // Duplicate adds are rejected; use update instead
//! assert!(manager.add(MarketData::new("AAPL", 101.0, 0.05, 0.2).unwrap()).is_err());
//! manager.update(MarketData::new("AAPL", 101.0, 0.05, 0.2).unwrap()).unwrap();
//! assert_eq!(manager.get("AAPL").unwrap().spot(), 101.0);
//! ```

mod manager;
mod quote;

pub use manager::{MarketDataManager, MarketDataMap};
pub use quote::{MarketData, ModelInputs};
