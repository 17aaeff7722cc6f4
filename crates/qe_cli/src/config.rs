//! Engine and logging configuration.
//!
//! Settings come from four layers. Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`QE_RISK_SIMULATIONS`, `QE_RISK_SEED`,
//!    `QE_LOG_LEVEL`)
//! 3. The `[engine]` table of the scenario file
//! 4. Default values

use std::str::FromStr;

use qe_risk::engine::RiskEngineConfig;
use qe_risk::parallel::ParallelConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the path count.
pub const ENV_SIMULATIONS: &str = "QE_RISK_SIMULATIONS";
/// Environment variable fixing the seed.
pub const ENV_SEED: &str = "QE_RISK_SEED";
/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "QE_LOG_LEVEL";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("Invalid scenario: {0}")]
    Scenario(String),
}

/// Log levels accepted by `--log-level` and `QE_LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// `[engine]` table of a scenario file. Missing keys take engine defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    pub var_simulations: usize,
    pub time_horizon_days: f64,
    pub seed: u64,
    pub use_fixed_seed: bool,
    pub batch_size: usize,
    pub parallel_threshold: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        let engine = RiskEngineConfig::default();
        Self {
            var_simulations: engine.var_simulations,
            time_horizon_days: engine.time_horizon_days,
            seed: engine.seed,
            use_fixed_seed: engine.use_fixed_seed,
            batch_size: engine.parallel.batch_size,
            parallel_threshold: engine.parallel.parallel_threshold,
        }
    }
}

/// Optional overrides from one layer (environment or command line).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOverrides {
    pub var_simulations: Option<usize>,
    /// Setting a seed also turns the fixed seed on.
    pub seed: Option<u64>,
}

impl EngineOverrides {
    /// Reads `QE_RISK_SIMULATIONS` and `QE_RISK_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = Self::default();

        if let Some(value) = lookup(ENV_SIMULATIONS) {
            overrides.var_simulations = Some(value.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{} must be an integer, got '{}'", ENV_SIMULATIONS, value))
            })?);
        }

        if let Some(value) = lookup(ENV_SEED) {
            overrides.seed = Some(value.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{} must be an integer, got '{}'", ENV_SEED, value))
            })?);
        }

        Ok(overrides)
    }

    /// Values from `higher` win; missing ones fall back to `self`.
    pub fn overridden_by(self, higher: EngineOverrides) -> Self {
        Self {
            var_simulations: higher.var_simulations.or(self.var_simulations),
            seed: higher.seed.or(self.seed),
        }
    }
}

/// Build the engine configuration from all sources
///
/// `env` and `cli` are applied on top of the scenario's `[engine]` table,
/// command line last. Range checks are left to
/// [`RiskEngine::with_config`](qe_risk::engine::RiskEngine::with_config).
pub fn build_engine_config(
    file: &EngineSection,
    env: EngineOverrides,
    cli: EngineOverrides,
) -> RiskEngineConfig {
    let merged = env.overridden_by(cli);

    let mut config = RiskEngineConfig {
        var_simulations: file.var_simulations,
        time_horizon_days: file.time_horizon_days,
        seed: file.seed,
        use_fixed_seed: file.use_fixed_seed,
        parallel: ParallelConfig::new(file.batch_size, file.parallel_threshold),
    };

    if let Some(simulations) = merged.var_simulations {
        config.var_simulations = simulations;
    }
    if let Some(seed) = merged.seed {
        config.seed = seed;
        config.use_fixed_seed = true;
    }

    config
}

/// Resolve the log level: `--verbose`, then `--log-level`, then
/// `QE_LOG_LEVEL`, then `info`.
pub fn resolve_log_level(
    cli: Option<&str>,
    verbose: bool,
    env: Option<String>,
) -> Result<LogLevel, ConfigError> {
    if verbose {
        return Ok(LogLevel::Debug);
    }
    match (cli, env) {
        (Some(level), _) => LogLevel::from_str(level),
        (None, Some(level)) => LogLevel::from_str(&level),
        (None, None) => Ok(LogLevel::default()),
    }
}
