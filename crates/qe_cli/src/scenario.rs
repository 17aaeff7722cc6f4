//! Scenario files: market data, positions and engine settings in TOML.
//!
//! ```toml
//! [engine]
//! var_simulations = 20000
//! seed = 7
//! use_fixed_seed = true
//!
//! [[market_data]]
//! asset_id = "AAPL"
//! spot = 100.0
//! rate = 0.05
//! volatility = 0.2
//!
//! [[positions]]
//! style = "european"
//! option_type = "call"
//! strike = 105.0
//! time_to_expiry = 0.5
//! asset_id = "AAPL"
//! quantity = 100
//! model = "merton_jump_diffusion"
//! jump = { intensity = 0.1, mean = -0.05, volatility = 0.1 }
//! ```

use std::path::Path;

use qe_core::market_data::{MarketData, MarketDataManager};
use qe_core::types::PricingError;
use qe_models::instruments::{
    AmericanOption, EuropeanOption, Instrument, OptionType, PricingModel,
};
use qe_models::jump::JumpParameters;
use qe_risk::portfolio::Portfolio;
use serde::Deserialize;
use tracing::debug;

use crate::config::{ConfigError, EngineSection};
use crate::{CliError, Result};

/// A parsed scenario file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub market_data: Vec<MarketDataSpec>,
    #[serde(default)]
    pub positions: Vec<PositionSpec>,
}

/// One `[[market_data]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketDataSpec {
    pub asset_id: String,
    pub spot: f64,
    pub rate: f64,
    pub volatility: f64,
    #[serde(default)]
    pub dividend_yield: f64,
}

/// Exercise style of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleSpec {
    #[default]
    European,
    American,
}

/// Inline `jump = { ... }` table.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JumpSpec {
    pub intensity: f64,
    pub mean: f64,
    pub volatility: f64,
}

/// One `[[positions]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionSpec {
    #[serde(default)]
    pub style: StyleSpec,
    pub option_type: OptionType,
    pub strike: f64,
    pub time_to_expiry: f64,
    pub asset_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub model: Option<PricingModel>,
    #[serde(default)]
    pub binomial_steps: Option<usize>,
    #[serde(default)]
    pub jump: Option<JumpSpec>,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read scenario file: {}", e)))?;
        let scenario = Self::parse(&content)?;
        debug!(
            path = %path.display(),
            assets = scenario.market_data.len(),
            positions = scenario.positions.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    /// Parses scenario TOML.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)).into())
    }

    /// Validated market data, keyed by asset id. Duplicate ids are rejected.
    pub fn market_data(&self) -> Result<MarketDataManager> {
        let mut manager = MarketDataManager::new();
        for spec in &self.market_data {
            manager.add(spec.build()?)?;
        }
        Ok(manager)
    }

    /// Builds every position in file order.
    pub fn portfolio(&self) -> Result<Portfolio> {
        let mut portfolio = Portfolio::with_capacity(self.positions.len());
        for (index, spec) in self.positions.iter().enumerate() {
            let instrument = spec.build(index)?;
            portfolio
                .add(instrument, spec.quantity)
                .map_err(PricingError::from)?;
        }
        Ok(portfolio)
    }
}

impl MarketDataSpec {
    /// Validated [`MarketData`].
    pub fn build(&self) -> Result<MarketData> {
        Ok(MarketData::with_dividend_yield(
            self.asset_id.as_str(),
            self.spot,
            self.rate,
            self.volatility,
            self.dividend_yield,
        )?)
    }
}

impl PositionSpec {
    /// Builds the instrument. `index` only labels errors.
    pub fn build(&self, index: usize) -> Result<Instrument> {
        match self.style {
            StyleSpec::European => {
                let mut option = EuropeanOption::new(
                    self.option_type,
                    self.strike,
                    self.time_to_expiry,
                    self.asset_id.as_str(),
                )?
                .with_pricing_model(self.model.unwrap_or_default());
                if let Some(steps) = self.binomial_steps {
                    option = option.with_binomial_steps(steps)?;
                }
                if let Some(jump) = self.jump {
                    let jumps = JumpParameters::new(jump.intensity, jump.mean, jump.volatility)
                        .map_err(PricingError::from)?;
                    option = option.with_jump_parameters(jumps)?;
                }
                Ok(Instrument::European(option))
            }
            StyleSpec::American => {
                if matches!(self.model, Some(model) if model != PricingModel::Binomial) {
                    return Err(ConfigError::Scenario(format!(
                        "position {}: american options are priced on the binomial lattice only",
                        index
                    ))
                    .into());
                }
                if self.jump.is_some() {
                    return Err(ConfigError::Scenario(format!(
                        "position {}: jump parameters apply to european options only",
                        index
                    ))
                    .into());
                }
                let mut option = AmericanOption::new(
                    self.option_type,
                    self.strike,
                    self.time_to_expiry,
                    self.asset_id.as_str(),
                )?;
                if let Some(steps) = self.binomial_steps {
                    option = option.with_binomial_steps(steps)?;
                }
                Ok(Instrument::American(option))
            }
        }
    }
}
