//! Runtime configuration for a [`GatewayClient`](crate::GatewayClient).

use std::time::Duration;

use crate::protocol::{self, IdentifyProperties};
use crate::reconnect::ReconnectPolicy;

/// How long a deliberate close may wait for the peer before the socket is
/// treated as terminated.
pub const DEFAULT_CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Configuration for one gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway base URL without query string.
    pub url: String,
    /// Gateway API version.
    pub api_version: u8,
    /// Intents bitmask sent in Identify.
    pub intents: u32,
    /// Client properties sent in Identify.
    pub properties: IdentifyProperties,
    /// What to do after an unplanned disconnect.
    pub reconnect: ReconnectPolicy,
    /// How long to wait for the peer to acknowledge a deliberate close.
    pub close_grace: Duration,
    /// Buffer size of the notification channel per subscriber.
    pub event_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: protocol::DEFAULT_GATEWAY_URL.to_string(),
            api_version: protocol::API_VERSION,
            intents: protocol::DEFAULT_INTENTS,
            properties: IdentifyProperties::default(),
            reconnect: ReconnectPolicy::default(),
            close_grace: DEFAULT_CLOSE_GRACE,
            event_capacity: 256,
        }
    }
}

impl GatewayConfig {
    /// Config pointing at `url` with everything else defaulted.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Full endpoint including version and encoding.
    #[must_use]
    pub fn endpoint(&self) -> String {
        protocol::endpoint(&self.url, self.api_version)
    }

    /// Intents actually sent: the configured mask plus the presence intent,
    /// which the client cannot work without.
    #[must_use]
    pub fn effective_intents(&self) -> u32 {
        self.intents | protocol::PRESENCE_INTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint() {
        let config = GatewayConfig::default();
        assert_eq!(config.endpoint(), "wss://gateway.discord.gg/?v=10&encoding=json");
    }

    #[test]
    fn presence_intent_always_requested() {
        let config = GatewayConfig {
            intents: 1,
            ..GatewayConfig::default()
        };
        assert_eq!(config.effective_intents(), 1 | protocol::PRESENCE_INTENT);
    }

    #[test]
    fn with_url_keeps_defaults() {
        let config = GatewayConfig::with_url("ws://127.0.0.1:1234");
        assert_eq!(config.api_version, 10);
        assert!(config.reconnect.is_enabled());
    }
}
