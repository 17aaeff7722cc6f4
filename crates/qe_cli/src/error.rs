//! CLI error types.

use qe_core::types::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `qe-risk` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Scenario or environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scenario file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A command-line argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pricing or risk calculation failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Report could not be serialised.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
