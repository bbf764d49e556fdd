//! Bridge from `pulse_config::Config` to engine and telemetry types.

use std::time::Duration;

use pulse_config::Config;
use pulse_gateway::protocol::IdentifyProperties;
use pulse_gateway::{GatewayConfig, ReconnectPolicy};
use pulse_telemetry::LogConfig;

/// Build the engine configuration from the unified config.
pub(crate) fn to_gateway_config(config: &Config) -> GatewayConfig {
    let gateway = &config.gateway;
    let defaults = IdentifyProperties::default();
    let properties = IdentifyProperties {
        os: gateway.properties.os.clone().unwrap_or(defaults.os),
        browser: gateway.properties.browser.clone().unwrap_or(defaults.browser),
        device: gateway.properties.device.clone().unwrap_or(defaults.device),
    };

    let reconnect = if config.reconnect.enabled {
        ReconnectPolicy::new(Duration::from_millis(config.reconnect.delay_ms))
    } else {
        ReconnectPolicy::disabled()
    };

    GatewayConfig {
        url: gateway.url.clone(),
        api_version: gateway.api_version,
        intents: gateway.intents,
        properties,
        reconnect,
        ..GatewayConfig::default()
    }
}

/// Build the logging configuration. `--verbose` raises the level to debug.
pub(crate) fn to_log_config(config: &Config, verbose: bool) -> LogConfig {
    let mut log_config = LogConfig::from(&config.logging);
    if verbose {
        "debug".clone_into(&mut log_config.level);
    }
    log_config
}
