//! Configuration types for the Pulse client.
//!
//! These types mirror the engine's runtime configuration without depending
//! on it. Every struct implements [`Default`] with the same values as the
//! embedded `defaults.toml`, so a bare `[section]` header still produces a
//! working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gateway endpoint and identify settings.
    pub gateway: GatewaySection,
    /// Automatic reconnect after unplanned disconnects.
    pub reconnect: ReconnectSection,
    /// Logging and tracing.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// GatewaySection
// ---------------------------------------------------------------------------

/// Gateway endpoint and identify settings.
///
/// `token` is a secret: it is never serialized and `Debug` only reports
/// whether one is present.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Base URL without query string (`ws://` or `wss://`).
    pub url: String,
    /// Gateway API version.
    pub api_version: u8,
    /// Authentication token used when the front-end connects on startup.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Intents bitmask. Must include the presence intent.
    pub intents: u32,
    /// Client properties sent in Identify.
    pub properties: PropertiesSection,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            url: "wss://gateway.discord.gg".to_owned(),
            api_version: 10,
            token: None,
            intents: PRESENCE_INTENT,
            properties: PropertiesSection::default(),
        }
    }
}

impl std::fmt::Debug for GatewaySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySection")
            .field("url", &self.url)
            .field("api_version", &self.api_version)
            .field("has_token", &self.token.is_some())
            .field("intents", &self.intents)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Presence intent bit. Validation rejects masks without it.
pub const PRESENCE_INTENT: u32 = 1 << 8;

/// Client properties. Unset fields fall back to the engine's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesSection {
    /// Operating system name; the host OS when unset.
    pub os: Option<String>,
    /// Library or browser name.
    pub browser: Option<String>,
    /// Device name.
    pub device: Option<String>,
}

impl Default for PropertiesSection {
    fn default() -> Self {
        Self {
            os: None,
            browser: Some("pulse".to_owned()),
            device: Some("pulse".to_owned()),
        }
    }
}

// ---------------------------------------------------------------------------
// ReconnectSection
// ---------------------------------------------------------------------------

/// Automatic reconnect after the socket drops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectSection {
    /// Whether to reconnect at all.
    pub enabled: bool,
    /// Fixed delay before each attempt, in milliseconds.
    pub delay_ms: u64,
}

impl Default for ReconnectSection {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 1000,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["pulse_gateway=debug"]`).
    pub directives: Vec<String>,
    /// Write rolling log files here instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// File rotation when `directory` is set: `"daily"`, `"hourly"`, or
    /// `"never"`.
    pub rotation: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            directory: None,
            rotation: "daily".to_owned(),
        }
    }
}
