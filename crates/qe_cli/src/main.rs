//! qe-risk CLI - option pricing and portfolio risk from scenario files
//!
//! # Commands
//!
//! - `qe-risk risk --scenario <file>` - Aggregated Greeks, VaR and ES
//! - `qe-risk price --scenario <file>` - Per-position price and Greeks
//! - `qe-risk implied-vol ...` - Black-Scholes implied volatility
//! - `qe-risk check --scenario <file>` - Validate a scenario

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use qe_cli::commands;
use qe_cli::commands::implied_vol::{ImpliedVolRequest, OptionTypeArg};
use qe_cli::config::{resolve_log_level, EngineOverrides, ENV_LOG_LEVEL};
use qe_cli::output::OutputFormat;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Option pricing and portfolio risk
#[derive(Parser)]
#[command(name = "qe-risk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregated Greeks plus VaR and ES at 95% and 99%
    Risk {
        /// Path to scenario file (TOML)
        #[arg(short, long, value_name = "FILE")]
        scenario: PathBuf,

        /// Number of Monte Carlo paths
        #[arg(short = 'n', long)]
        simulations: Option<usize>,

        /// Fixed seed (implies a reproducible run)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Price every position and report its Greeks
    Price {
        /// Path to scenario file (TOML)
        #[arg(short, long, value_name = "FILE")]
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Black-Scholes implied volatility of a quoted price
    ImpliedVol {
        /// Call or put
        #[arg(short = 't', long, value_enum)]
        option_type: OptionTypeArg,

        /// Spot price
        #[arg(long)]
        spot: f64,

        /// Strike
        #[arg(long)]
        strike: f64,

        /// Continuously compounded risk-free rate
        #[arg(long)]
        rate: f64,

        /// Continuous dividend yield
        #[arg(long, default_value_t = 0.0)]
        dividend_yield: f64,

        /// Time to expiry in years
        #[arg(long)]
        expiry: f64,

        /// Quoted option price
        #[arg(long)]
        price: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate a scenario without simulating
    Check {
        /// Path to scenario file (TOML)
        #[arg(short, long, value_name = "FILE")]
        scenario: PathBuf,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = resolve_log_level(
        cli.log_level.as_deref(),
        cli.verbose,
        std::env::var(ENV_LOG_LEVEL).ok(),
    )?;
    init_tracing(level.as_filter_str());
    info!(version = qe_cli::VERSION, log_level = %level, "qe-risk starting");

    let report = match cli.command {
        Commands::Risk {
            scenario,
            simulations,
            seed,
            format,
        } => {
            let overrides = EngineOverrides {
                var_simulations: simulations,
                seed,
            };
            commands::risk::run(&scenario, overrides, format)
                .with_context(|| format!("risk calculation failed for {}", scenario.display()))?
        }
        Commands::Price { scenario, format } => commands::price::run(&scenario, format)
            .with_context(|| format!("pricing failed for {}", scenario.display()))?,
        Commands::ImpliedVol {
            option_type,
            spot,
            strike,
            rate,
            dividend_yield,
            expiry,
            price,
            format,
        } => commands::implied_vol::run(
            ImpliedVolRequest {
                option_type: option_type.into(),
                spot,
                strike,
                rate,
                dividend_yield,
                expiry,
                price,
            },
            format,
        )?,
        Commands::Check { scenario } => commands::check::run(&scenario)
            .with_context(|| format!("scenario check failed for {}", scenario.display()))?,
    };

    print!("{}", report);
    Ok(())
}
