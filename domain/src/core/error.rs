//! Domain error types

use thiserror::Error;

/// Errors raised while building a configuration value.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration overrides must be a mapping, got {0}")]
    NotAMapping(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
