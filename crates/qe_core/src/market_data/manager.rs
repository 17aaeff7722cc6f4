//! Asset id keyed store of market quotes.

use std::collections::HashMap;

use super::quote::MarketData;
use crate::types::{PricingError, PricingResult};

/// Mapping from asset id to its market quote, as consumed by the risk engine.
pub type MarketDataMap = HashMap<String, MarketData>;

/// Holds one [`MarketData`] per asset.
///
/// `add` rejects duplicates and `update` rejects unknown assets, so a caller
/// always states whether it expects the quote to exist.
#[derive(Debug, Clone, Default)]
pub struct MarketDataManager {
    quotes: MarketDataMap,
}

impl MarketDataManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new quote.
    ///
    /// # Errors
    /// `Validation` if the quote is invalid or the asset already exists.
    pub fn add(&mut self, market_data: MarketData) -> PricingResult<()> {
        market_data.validate()?;
        if self.quotes.contains_key(market_data.asset_id()) {
            return Err(PricingError::validation(
                market_data.asset_id(),
                "asset_id",
                "already has market data; use update instead",
            ));
        }
        self.quotes
            .insert(market_data.asset_id().to_string(), market_data);
        Ok(())
    }

    /// Replaces an existing quote.
    ///
    /// # Errors
    /// `Validation` if the quote is invalid, `MissingMarketData` if the asset
    /// has no quote yet.
    pub fn update(&mut self, market_data: MarketData) -> PricingResult<()> {
        market_data.validate()?;
        match self.quotes.get_mut(market_data.asset_id()) {
            Some(slot) => {
                *slot = market_data;
                Ok(())
            }
            None => Err(PricingError::missing_market_data(market_data.asset_id())),
        }
    }

    /// Looks up a quote.
    pub fn get(&self, asset_id: &str) -> PricingResult<&MarketData> {
        if asset_id.is_empty() {
            return Err(PricingError::validation(
                "market data",
                "asset_id",
                "cannot be empty",
            ));
        }
        self.quotes
            .get(asset_id)
            .ok_or_else(|| PricingError::missing_market_data(asset_id))
    }

    /// Returns whether the asset has a quote.
    pub fn contains(&self, asset_id: &str) -> bool {
        self.quotes.contains_key(asset_id)
    }

    /// Removes and returns a quote.
    pub fn remove(&mut self, asset_id: &str) -> PricingResult<MarketData> {
        if asset_id.is_empty() {
            return Err(PricingError::validation(
                "market data",
                "asset_id",
                "cannot be empty",
            ));
        }
        self.quotes
            .remove(asset_id)
            .ok_or_else(|| PricingError::missing_market_data(asset_id))
    }

    /// Removes every quote.
    pub fn clear(&mut self) {
        self.quotes.clear();
    }

    /// Number of assets with a quote.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns true when no quotes are held.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &MarketDataMap {
        &self.quotes
    }

    /// Consumes the manager, returning the underlying map.
    pub fn into_map(self) -> MarketDataMap {
        self.quotes
    }
}
