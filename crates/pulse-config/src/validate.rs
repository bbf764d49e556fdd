//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Config, PRESENCE_INTENT};

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Formats accepted by `logging.format`.
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Rotations accepted by `logging.rotation`.
const LOG_ROTATIONS: &[&str] = &["daily", "hourly", "never"];

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_gateway(config)?;
    validate_reconnect(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_gateway(config: &Config) -> ConfigResult<()> {
    let g = &config.gateway;

    if !(g.url.starts_with("ws://") || g.url.starts_with("wss://")) {
        return Err(invalid(
            "gateway.url",
            format!("'{}' must use the ws:// or wss:// scheme", g.url),
        ));
    }

    if g.intents & PRESENCE_INTENT == 0 {
        return Err(invalid(
            "gateway.intents",
            format!("intents {} must include the presence intent ({PRESENCE_INTENT})", g.intents),
        ));
    }

    if let Some(token) = &g.token
        && token.trim().is_empty()
    {
        return Err(invalid("gateway.token", "token must not be blank".to_owned()));
    }

    Ok(())
}

fn validate_reconnect(config: &Config) -> ConfigResult<()> {
    if config.reconnect.delay_ms == 0 {
        return Err(invalid(
            "reconnect.delay_ms",
            "delay_ms must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !LOG_LEVELS.contains(&l.level.to_lowercase().as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unknown level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if !LOG_FORMATS.contains(&l.format.to_lowercase().as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unknown format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }

    if !LOG_ROTATIONS.contains(&l.rotation.to_lowercase().as_str()) {
        return Err(invalid(
            "logging.rotation",
            format!(
                "unknown rotation '{}'; expected one of: {}",
                l.rotation,
                LOG_ROTATIONS.join(", ")
            ),
        ));
    }

    if l.directory.as_ref().is_some_and(|dir| dir.as_os_str().is_empty()) {
        return Err(invalid("logging.directory", "must not be empty".to_owned()));
    }

    Ok(())
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message,
    }
}
