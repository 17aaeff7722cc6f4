//! Implied-vol command implementation
//!
//! Inverts Black-Scholes for a single quoted option price.

use clap::ValueEnum;
use qe_core::market_data::ModelInputs;
use qe_models::analytical::{BlackScholes, ImpliedVolatility};
use qe_models::instruments::OptionType;
use serde::Serialize;
use tracing::info;

use crate::output::{num, table, to_json, OutputFormat, ReportHeader};
use crate::Result;

/// `--option-type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionTypeArg {
    Call,
    Put,
}

impl From<OptionTypeArg> for OptionType {
    fn from(arg: OptionTypeArg) -> Self {
        match arg {
            OptionTypeArg::Call => OptionType::Call,
            OptionTypeArg::Put => OptionType::Put,
        }
    }
}

/// Inputs of one implied volatility query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolRequest {
    pub option_type: OptionType,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub dividend_yield: f64,
    pub expiry: f64,
    pub price: f64,
}

/// JSON shape of an implied volatility report.
#[derive(Debug, Serialize)]
pub struct ImpliedVolOutput {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub option_type: String,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub dividend_yield: f64,
    pub expiry: f64,
    pub market_price: f64,
    pub implied_volatility: f64,
    /// Black-Scholes price at the solved volatility.
    pub repriced: f64,
}

/// Run the implied-vol command
pub fn run(request: ImpliedVolRequest, format: OutputFormat) -> Result<String> {
    let report = evaluate(request)?;
    render(&report, format)
}

/// Solves for the volatility and reprices at it.
pub fn evaluate(request: ImpliedVolRequest) -> Result<ImpliedVolOutput> {
    // Volatility is a placeholder; the solver replaces it.
    let inputs = ModelInputs::new(request.spot, request.rate, 0.2, request.dividend_yield);
    let vol = ImpliedVolatility::default().solve(
        request.option_type,
        request.price,
        inputs,
        request.strike,
        request.expiry,
    )?;
    let repriced = BlackScholes::from_inputs(inputs.with_volatility(vol))?.price(
        request.option_type,
        request.strike,
        request.expiry,
    )?;
    info!(implied_volatility = vol, "Implied volatility solved");

    Ok(ImpliedVolOutput {
        header: ReportHeader::now(),
        option_type: request.option_type.to_string(),
        spot: request.spot,
        strike: request.strike,
        rate: request.rate,
        dividend_yield: request.dividend_yield,
        expiry: request.expiry,
        market_price: request.price,
        implied_volatility: vol,
        repriced,
    })
}

/// Formats a report.
pub fn render(report: &ImpliedVolOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Table => {
            let rows = vec![
                vec!["option_type".to_string(), report.option_type.clone()],
                vec!["spot".to_string(), num(report.spot)],
                vec!["strike".to_string(), num(report.strike)],
                vec!["rate".to_string(), num(report.rate)],
                vec!["dividend_yield".to_string(), num(report.dividend_yield)],
                vec!["expiry".to_string(), num(report.expiry)],
                vec!["market_price".to_string(), num(report.market_price)],
                vec!["implied_volatility".to_string(), num(report.implied_volatility)],
                vec!["repriced".to_string(), num(report.repriced)],
            ];
            Ok(format!(
                "{}\n{}",
                report.header.banner(),
                table(&["Field", "Value"], &rows)
            ))
        }
    }
}
