//! Risk command implementation
//!
//! Runs the full portfolio risk calculation on a scenario.

use std::path::Path;

use qe_risk::engine::{PortfolioRiskResult, RiskEngine, RiskEngineConfig, SimulationDiagnostics};
use serde::Serialize;
use tracing::info;

use crate::config::{build_engine_config, EngineOverrides};
use crate::output::{num, table, to_json, OutputFormat, ReportHeader};
use crate::scenario::Scenario;
use crate::Result;

/// JSON shape of a risk report.
#[derive(Debug, Serialize)]
pub struct RiskReportOutput {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub scenario: String,
    pub positions: usize,
    pub assets: usize,
    pub var_simulations: usize,
    pub time_horizon_days: f64,
    pub result: PortfolioRiskResult,
    pub diagnostics: SimulationDiagnostics,
}

/// Run the risk command
pub fn run(
    scenario_path: &Path,
    overrides: EngineOverrides,
    format: OutputFormat,
) -> Result<String> {
    let scenario = Scenario::load(scenario_path)?;
    let config = build_engine_config(&scenario.engine, EngineOverrides::from_env()?, overrides);
    let report = evaluate(&scenario, config, &scenario_path.display().to_string())?;
    render(&report, format)
}

/// Builds the engine, market data and portfolio and runs the calculation.
pub fn evaluate(
    scenario: &Scenario,
    config: RiskEngineConfig,
    label: &str,
) -> Result<RiskReportOutput> {
    let engine = RiskEngine::with_config(config)?;
    let market = scenario.market_data()?;
    let portfolio = scenario.portfolio()?;

    info!(
        scenario = label,
        positions = portfolio.len(),
        simulations = engine.var_simulations(),
        fixed_seed = engine.use_fixed_seed(),
        "Starting risk calculation"
    );

    let report = engine.calculate_portfolio_risk_detailed(&portfolio, market.as_map())?;

    info!(
        paths = report.diagnostics.paths_simulated,
        skipped = report.diagnostics.simulation_skipped,
        "Risk calculation complete"
    );

    Ok(RiskReportOutput {
        header: ReportHeader::now(),
        scenario: label.to_string(),
        positions: portfolio.len(),
        assets: market.len(),
        var_simulations: engine.var_simulations(),
        time_horizon_days: engine.time_horizon_days(),
        result: report.result,
        diagnostics: report.diagnostics,
    })
}

/// Formats a report.
pub fn render(report: &RiskReportOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = report
                .result
                .fields()
                .iter()
                .map(|(name, value)| vec![name.to_string(), num(*value)])
                .collect();

            let simulation = if report.diagnostics.simulation_skipped {
                "simulation skipped (empty or zero-value portfolio)".to_string()
            } else {
                format!(
                    "{} paths over {} day(s), seed {}",
                    report.diagnostics.paths_simulated,
                    report.time_horizon_days,
                    report
                        .diagnostics
                        .seed
                        .map_or_else(|| "-".to_string(), |s| s.to_string())
                )
            };

            Ok(format!(
                "{}\nScenario: {} ({} positions, {} assets)\n{}{}\n",
                report.header.banner(),
                report.scenario,
                report.positions,
                report.assets,
                table(&["Metric", "Value"], &rows),
                simulation
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        Scenario::parse(
            r#"
            [engine]
            var_simulations = 500
            seed = 11
            use_fixed_seed = true

            [[market_data]]
            asset_id = "AAPL"
            spot = 100.0
            rate = 0.05
            volatility = 0.2

            [[positions]]
            option_type = "call"
            strike = 100.0
            time_to_expiry = 1.0
            asset_id = "AAPL"
            quantity = 10
            "#,
        )
        .unwrap()
    }

    fn config(s: &Scenario) -> RiskEngineConfig {
        build_engine_config(&s.engine, EngineOverrides::default(), EngineOverrides::default())
    }

    #[test]
    fn test_evaluate_scenario() {
        let s = scenario();
        let report = evaluate(&s, config(&s), "inline").unwrap();
        assert!((report.result.total_pv - 104.50584).abs() < 1e-3);
        assert_eq!(report.diagnostics.paths_simulated, 500);
        assert_eq!(report.diagnostics.seed, Some(11));
    }

    #[test]
    fn test_table_lists_every_metric() {
        let s = scenario();
        let report = evaluate(&s, config(&s), "inline").unwrap();
        let text = render(&report, OutputFormat::Table).unwrap();
        for (name, _) in report.result.fields() {
            assert!(text.contains(name), "missing {}", name);
        }
        assert!(text.contains("500 paths"));
    }

    #[test]
    fn test_json_round_trips_through_serde_json() {
        let s = scenario();
        let report = evaluate(&s, config(&s), "inline").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["positions"], 1);
        assert_eq!(json["diagnostics"]["seed"], 11);
        assert!(json["generated_at"].is_string());
        assert!(json["result"]["value_at_risk_99"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_missing_asset_propagates() {
        let mut s = scenario();
        s.market_data.clear();
        let err = evaluate(&s, config(&s), "inline").unwrap_err();
        assert!(err.to_string().contains("AAPL"));
    }
}
