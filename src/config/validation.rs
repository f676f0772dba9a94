//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check the store URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::new("listener.host", "must not be empty"));
    }

    if let Err(e) = url::Url::parse(&config.store.url) {
        errors.push(ValidationError::new(
            "store.url",
            format!("invalid URL '{}': {}", config.store.url, e),
        ));
    }

    if config.store.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "store.connect_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.startup.base_delay_ms == 0 {
        errors.push(ValidationError::new(
            "startup.base_delay_ms",
            "must be greater than 0",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than 0",
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: '{}'", config.observability.metrics_address),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new(
            "security.max_body_size",
            "must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
