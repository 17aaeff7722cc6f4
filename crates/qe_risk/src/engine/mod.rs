//! Portfolio risk engine.
//!
//! [`RiskEngine::calculate_portfolio_risk`] runs four stages:
//!
//! 1. Resolve and validate market data for every referenced asset
//! 2. Aggregate price and Greeks × quantity across positions
//! 3. Simulate one-step GBM P&L (skipped for empty or zero-value books)
//! 4. Read VaR and ES at 95% and 99% off the sorted P&L sample
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//!
//! use qe_core::market_data::MarketData;
//! use qe_models::instruments::{EuropeanOption, Instrument, OptionType};
//! use qe_risk::engine::RiskEngine;
//! use qe_risk::portfolio::Portfolio;
//!
//! let mut market = HashMap::new();
//! market.insert("AAPL".to_string(), MarketData::new("AAPL", 100.0, 0.05, 0.2).unwrap());
//!
//! let mut portfolio = Portfolio::new();
//! let call = EuropeanOption::new(OptionType::Call, 100.0, 1.0, "AAPL").unwrap();
//! portfolio.add(Instrument::European(call), 10).unwrap();
//!
//! let mut engine = RiskEngine::new();
//! engine.set_var_simulations(2_000).unwrap();
//! engine.set_use_fixed_seed(true);
//!
//! let risk = engine.calculate_portfolio_risk(&portfolio, &market).unwrap();
//! assert!((risk.total_pv - 104.506).abs() < 1e-2);
//! assert!(risk.value_at_risk_99 >= risk.value_at_risk_95);
//! ```

mod config;
pub mod metrics;
mod result;
mod simulation;

pub use config::{
    RiskEngineConfig, CONFIDENCE_LEVELS, DEFAULT_SEED, DEFAULT_VAR_SIMULATIONS,
    MAX_TIME_HORIZON_DAYS, MAX_VAR_SIMULATIONS, TRADING_DAYS_PER_YEAR,
};
pub use metrics::TailMetrics;
pub use result::{PortfolioRiskResult, RiskReport, SimulationDiagnostics};

use qe_core::market_data::{MarketData, MarketDataMap};
use qe_core::types::{PricingError, PricingResult};
use qe_models::greeks::Greeks;
use tracing::{debug, info, info_span};

use crate::parallel::ParallelConfig;
use crate::portfolio::Portfolio;
use crate::rng::RiskRng;
use simulation::{SimulatedAsset, SimulatedPosition, SimulationPlan};

/// Portfolio values below this magnitude are treated as zero and skip the
/// simulation.
pub const ZERO_VALUE_THRESHOLD: f64 = 1e-10;

/// Aggregates Greeks and estimates VaR/ES by Monte Carlo.
///
/// Holds only configuration; every calculation borrows the portfolio and
/// market data and owns its own RNG state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskEngine {
    config: RiskEngineConfig,
}

impl RiskEngine {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a validated configuration.
    pub fn with_config(config: RiskEngineConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration.
    pub fn config(&self) -> &RiskEngineConfig {
        &self.config
    }

    /// Monte Carlo paths per calculation.
    pub fn var_simulations(&self) -> usize {
        self.config.var_simulations
    }

    /// Sets the path count; rejects values outside `[1, 1_000_000]`.
    pub fn set_var_simulations(&mut self, simulations: usize) -> PricingResult<()> {
        config::validate_simulations(simulations)?;
        self.config.var_simulations = simulations;
        Ok(())
    }

    /// VaR horizon in trading days.
    pub fn time_horizon_days(&self) -> f64 {
        self.config.time_horizon_days
    }

    /// Sets the horizon; rejects values outside `(0, 252]`.
    pub fn set_time_horizon_days(&mut self, days: f64) -> PricingResult<()> {
        config::validate_horizon(days)?;
        self.config.time_horizon_days = days;
        Ok(())
    }

    /// Base seed used when the fixed seed is enabled.
    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Sets the base seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
    }

    /// Whether every call reuses [`seed`](Self::seed).
    pub fn use_fixed_seed(&self) -> bool {
        self.config.use_fixed_seed
    }

    /// Enables or disables the fixed seed.
    pub fn set_use_fixed_seed(&mut self, fixed: bool) {
        self.config.use_fixed_seed = fixed;
    }

    /// Chunking and threading of the path loop.
    pub fn parallel_config(&self) -> &ParallelConfig {
        &self.config.parallel
    }

    /// Replaces the parallel configuration. The result does not depend on it.
    pub fn set_parallel_config(&mut self, parallel: ParallelConfig) {
        self.config.parallel = ParallelConfig::new(parallel.batch_size, parallel.parallel_threshold);
    }

    /// Confidence levels reported by every calculation.
    pub fn confidence_levels(&self) -> &'static [f64] {
        &CONFIDENCE_LEVELS
    }

    /// Aggregated Greeks and tail risk.
    ///
    /// # Errors
    /// - `MissingMarketData` if a referenced asset has no entry
    /// - `Validation` if an entry is invalid or belongs to another asset
    /// - `Numerical` for any non-finite aggregate or simulated value
    /// - any pricing error raised by an instrument
    pub fn calculate_portfolio_risk(
        &self,
        portfolio: &Portfolio,
        market_data: &MarketDataMap,
    ) -> PricingResult<PortfolioRiskResult> {
        self.calculate_portfolio_risk_detailed(portfolio, market_data)
            .map(|report| report.result)
    }

    /// [`calculate_portfolio_risk`](Self::calculate_portfolio_risk) plus
    /// simulation diagnostics.
    pub fn calculate_portfolio_risk_detailed(
        &self,
        portfolio: &Portfolio,
        market_data: &MarketDataMap,
    ) -> PricingResult<RiskReport> {
        let span = info_span!(
            "portfolio_risk",
            positions = portfolio.len(),
            simulations = self.config.var_simulations
        );
        let _guard = span.enter();

        if portfolio.is_empty() {
            debug!("empty portfolio, returning zero result");
            return Ok(RiskReport {
                result: PortfolioRiskResult::default(),
                diagnostics: SimulationDiagnostics {
                    simulation_skipped: true,
                    ..Default::default()
                },
            });
        }

        let assets = resolve_assets(portfolio, market_data)?;
        debug!(assets = assets.len(), "market data resolved");

        let mut plan = build_plan(portfolio, assets, self.config.horizon_years());
        let totals = aggregate(portfolio, &plan)?;
        debug!(
            total_pv = totals.price,
            total_delta = totals.delta,
            "greeks aggregated"
        );

        let mut result = PortfolioRiskResult::from_totals(totals);
        let mut diagnostics = SimulationDiagnostics::default();

        if totals.price.abs() < ZERO_VALUE_THRESHOLD {
            debug!("portfolio value is zero, skipping simulation");
            diagnostics.simulation_skipped = true;
        } else {
            let seed = if self.config.use_fixed_seed {
                self.config.seed
            } else {
                RiskRng::entropy_seed()
            };
            plan.initial_value = totals.price;
            debug!(seed, paths = self.config.var_simulations, "simulating");

            let mut output = plan.run(self.config.var_simulations, seed, &self.config.parallel)?;
            output.pnl.sort_unstable_by(f64::total_cmp);

            let [q95, q99] = CONFIDENCE_LEVELS;
            let m95 = metrics::tail_metrics(&output.pnl, q95);
            let m99 = metrics::tail_metrics(&output.pnl, q99);
            result.value_at_risk_95 = m95.value_at_risk;
            result.value_at_risk_99 = m99.value_at_risk;
            result.expected_shortfall_95 = m95.expected_shortfall;
            result.expected_shortfall_99 = m99.expected_shortfall;

            diagnostics = SimulationDiagnostics {
                paths_simulated: output.pnl.len(),
                normal_draws: output.normal_draws,
                seed: Some(seed),
                simulation_skipped: false,
            };
        }

        if let Some(field) = result.first_non_finite() {
            return Err(PricingError::numerical(
                "portfolio",
                format!("{} is not finite", field),
            ));
        }

        info!(
            total_pv = result.total_pv,
            var_95 = result.value_at_risk_95,
            var_99 = result.value_at_risk_99,
            es_95 = result.expected_shortfall_95,
            es_99 = result.expected_shortfall_99,
            paths = diagnostics.paths_simulated,
            "portfolio risk calculated"
        );

        Ok(RiskReport {
            result,
            diagnostics,
        })
    }

    /// Aggregated price and Greeks without the simulation stage.
    pub fn aggregate_greeks(
        &self,
        portfolio: &Portfolio,
        market_data: &MarketDataMap,
    ) -> PricingResult<Greeks> {
        if portfolio.is_empty() {
            return Ok(Greeks::default());
        }
        let assets = resolve_assets(portfolio, market_data)?;
        let plan = build_plan(portfolio, assets, self.config.horizon_years());
        aggregate(portfolio, &plan)
    }
}

/// Looks up and validates market data for each distinct asset, in order of
/// first appearance.
fn resolve_assets<'a>(
    portfolio: &'a Portfolio,
    market_data: &'a MarketDataMap,
) -> PricingResult<Vec<SimulatedAsset<'a>>> {
    portfolio
        .asset_ids()
        .into_iter()
        .map(|asset_id| -> PricingResult<SimulatedAsset<'a>> {
            let md: &MarketData = market_data
                .get(asset_id)
                .ok_or_else(|| PricingError::missing_market_data(asset_id))?;
            if md.asset_id() != asset_id {
                return Err(PricingError::validation(
                    asset_id,
                    "asset_id",
                    format!("market data entry is for '{}'", md.asset_id()),
                ));
            }
            md.validate()?;
            Ok(SimulatedAsset {
                asset_id,
                inputs: md.inputs(),
            })
        })
        .collect()
}

fn build_plan<'a>(
    portfolio: &'a Portfolio,
    assets: Vec<SimulatedAsset<'a>>,
    horizon_years: f64,
) -> SimulationPlan<'a> {
    let positions = portfolio
        .iter()
        .map(|position| SimulatedPosition {
            instrument: &position.instrument,
            asset: assets
                .iter()
                .position(|a| a.asset_id == position.asset_id())
                .unwrap_or_default(),
            quantity: position.quantity as f64,
        })
        .collect();
    SimulationPlan {
        assets,
        positions,
        initial_value: 0.0,
        horizon_years,
    }
}

/// Σ Greeks × quantity. Fails on the first non-finite scaled or running
/// total, naming the asset, position index and metric.
fn aggregate(portfolio: &Portfolio, plan: &SimulationPlan<'_>) -> PricingResult<Greeks> {
    let mut totals = Greeks::default();
    for (index, (position, resolved)) in portfolio.iter().zip(&plan.positions).enumerate() {
        let unit = position
            .instrument
            .greeks_with_inputs(plan.assets[resolved.asset].inputs)?;
        let scaled = unit.scale(resolved.quantity);
        totals += scaled;

        if let Some(metric) = scaled
            .first_non_finite()
            .or_else(|| totals.first_non_finite())
        {
            return Err(PricingError::numerical(
                position.asset_id(),
                format!("position {} {} is not finite after scaling", index, metric),
            ));
        }
    }
    Ok(totals)
}
