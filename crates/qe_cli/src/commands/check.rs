//! Check command implementation
//!
//! Validates a scenario end to end without running the simulation: engine
//! settings, market data, every position, and that each position's asset
//! has a quote.

use std::path::Path;

use qe_risk::engine::RiskEngine;
use tracing::info;

use crate::config::{build_engine_config, EngineOverrides};
use crate::scenario::Scenario;
use crate::Result;

/// Run the check command
pub fn run(scenario_path: &Path) -> Result<String> {
    let scenario = Scenario::load(scenario_path)?;
    let env = EngineOverrides::from_env()?;
    check(&scenario, env)
}

/// Validates `scenario` and summarises it.
pub fn check(scenario: &Scenario, env: EngineOverrides) -> Result<String> {
    let config = build_engine_config(&scenario.engine, env, EngineOverrides::default());
    let engine = RiskEngine::with_config(config)?;
    let market = scenario.market_data()?;
    let portfolio = scenario.portfolio()?;

    // Prices every position once; surfaces missing quotes and model failures.
    engine.aggregate_greeks(&portfolio, market.as_map())?;

    info!("Scenario check passed");
    Ok(format!(
        "OK: {} market data entries, {} positions, {} paths over {} day(s){}\n",
        market.len(),
        portfolio.len(),
        engine.var_simulations(),
        engine.time_horizon_days(),
        if engine.use_fixed_seed() {
            format!(", seed {}", engine.seed())
        } else {
            String::new()
        }
    ))
}
