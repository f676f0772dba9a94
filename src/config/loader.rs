//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the HTTP listen port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding `store.url`.
pub const STORE_URL_ENV: &str = "STORE_URL";

/// Exit code for an unusable configuration.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then environment overrides, then validation.
pub fn resolve_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PORT` and `STORE_URL` overrides using `lookup` to read variables.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(PORT_ENV).filter(|v| !v.is_empty()) {
        config.listener.port = value.trim().parse().map_err(|_| ConfigError::Env {
            var: PORT_ENV,
            value: value.clone(),
        })?;
    }

    if let Some(value) = lookup(STORE_URL_ENV).filter(|v| !v.is_empty()) {
        config.store.url = value;
    }

    Ok(())
}
