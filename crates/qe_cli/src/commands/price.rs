//! Price command implementation
//!
//! Prices every position of a scenario and reports unit and scaled Greeks.

use std::path::Path;

use qe_models::greeks::Greeks;
use serde::Serialize;
use tracing::info;

use crate::output::{num, table, to_json, OutputFormat, ReportHeader};
use crate::scenario::Scenario;
use crate::Result;

/// One priced position.
#[derive(Debug, Serialize)]
pub struct PricedPosition {
    pub index: usize,
    pub asset_id: String,
    pub instrument: &'static str,
    pub option_type: String,
    pub strike: f64,
    pub time_to_expiry: f64,
    pub model: String,
    pub quantity: i64,
    /// Greeks of one unit.
    pub unit: Greeks,
    /// Greeks × quantity.
    pub position: Greeks,
}

/// JSON shape of a price report.
#[derive(Debug, Serialize)]
pub struct PriceReportOutput {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub scenario: String,
    pub positions: Vec<PricedPosition>,
    pub total: Greeks,
}

/// Run the price command
pub fn run(scenario_path: &Path, format: OutputFormat) -> Result<String> {
    let scenario = Scenario::load(scenario_path)?;
    let report = evaluate(&scenario, &scenario_path.display().to_string())?;
    render(&report, format)
}

/// Prices each position against its asset's market data.
pub fn evaluate(scenario: &Scenario, label: &str) -> Result<PriceReportOutput> {
    let market = scenario.market_data()?;
    let portfolio = scenario.portfolio()?;
    info!(scenario = label, positions = portfolio.len(), "Starting pricing");

    let mut positions = Vec::with_capacity(portfolio.len());
    let mut total = Greeks::default();
    for (index, position) in portfolio.iter().enumerate() {
        let instrument = &position.instrument;
        let unit = instrument.greeks(market.get(position.asset_id())?)?;
        let scaled = unit.scale(position.quantity as f64);
        total += scaled;

        positions.push(PricedPosition {
            index,
            asset_id: position.asset_id().to_string(),
            instrument: instrument.instrument_type(),
            option_type: instrument.option_type().to_string(),
            strike: instrument.strike(),
            time_to_expiry: instrument.time_to_expiry(),
            model: instrument.pricing_model().to_string(),
            quantity: position.quantity,
            unit,
            position: scaled,
        });
    }

    info!(total_pv = total.price, "Pricing complete");
    Ok(PriceReportOutput {
        header: ReportHeader::now(),
        scenario: label.to_string(),
        positions,
        total,
    })
}

/// Formats a report.
pub fn render(report: &PriceReportOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Table => {
            let mut rows: Vec<Vec<String>> = report
                .positions
                .iter()
                .map(|p| {
                    vec![
                        p.index.to_string(),
                        p.asset_id.clone(),
                        format!("{} {}", p.instrument, p.option_type),
                        format!("{:.2}", p.strike),
                        format!("{:.4}", p.time_to_expiry),
                        p.model.clone(),
                        p.quantity.to_string(),
                        num(p.unit.price),
                        num(p.position.price),
                        num(p.position.delta),
                        num(p.position.gamma),
                        num(p.position.vega),
                        num(p.position.theta),
                    ]
                })
                .collect();
            if !rows.is_empty() {
                let t = &report.total;
                let mut total = vec![String::new(); 7];
                total[0] = "total".to_string();
                total.extend([
                    String::new(),
                    num(t.price),
                    num(t.delta),
                    num(t.gamma),
                    num(t.vega),
                    num(t.theta),
                ]);
                rows.push(total);
            }

            Ok(format!(
                "{}\nScenario: {}\n{}",
                report.header.banner(),
                report.scenario,
                table(
                    &[
                        "#", "Asset", "Instrument", "Strike", "Expiry", "Model", "Qty",
                        "Unit PV", "PV", "Delta", "Gamma", "Vega", "Theta/day",
                    ],
                    &rows,
                )
            ))
        }
    }
}
