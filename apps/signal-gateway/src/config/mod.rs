//! Configuration loading for the gateway.
//!
//! YAML files with `${VAR}` / `${VAR:-default}` environment variable
//! interpolation and post-parse validation.

mod broker;
mod safety;
mod trading;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use broker::BrokerConfig;
pub use safety::SafetyConfig;
pub use trading::TradingConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Broker venue configuration.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Trading limits.
    #[serde(default)]
    pub trading: TradingConfig,
    /// Liveness monitoring.
    #[serde(default)]
    pub safety: SafetyConfig,
}

/// Load configuration from a YAML file with environment variable
/// interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    // Match ${VAR} or ${VAR:-default} patterns
    let re = ENV_VAR_REGEX.get_or_init(|| {
        // This regex pattern is compile-time constant and always valid
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.trading.max_contracts == 0 {
        return Err(ConfigError::ValidationError(
            "trading.max_contracts must be positive".to_string(),
        ));
    }

    if config.trading.max_daily_loss.is_sign_negative()
        || config.trading.max_daily_loss.is_zero()
    {
        return Err(ConfigError::ValidationError(
            "trading.max_daily_loss must be positive".to_string(),
        ));
    }

    if config.trading.default_contract.is_empty() {
        return Err(ConfigError::ValidationError(
            "trading.default_contract must not be empty".to_string(),
        ));
    }

    if config.safety.heartbeat_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "safety.heartbeat_interval_secs must be positive".to_string(),
        ));
    }

    if config.broker.venue != "paper" {
        return Err(ConfigError::ValidationError(format!(
            "unknown broker venue '{}'",
            config.broker.venue
        )));
    }

    Ok(())
}
