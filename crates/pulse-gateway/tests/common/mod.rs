//! Shared setup for gateway integration tests.

#![allow(dead_code)]

use std::time::Duration;

use pulse_gateway::prelude::*;
use pulse_test::{MockGateway, MockSession, fixtures, next_event};
use serde_json::Value;
use tokio::sync::broadcast;

/// Reconnect delay used by tests.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(50);

/// Heartbeat interval long enough that no timer tick lands mid-test.
pub const QUIET_HEARTBEAT_MS: u64 = 60_000;

pub fn config(gateway: &MockGateway) -> GatewayConfig {
    GatewayConfig {
        reconnect: ReconnectPolicy::new(RECONNECT_DELAY),
        close_grace: Duration::from_millis(200),
        ..GatewayConfig::with_url(gateway.url())
    }
}

/// A client pointed at a fresh mock gateway, with an event subscription
/// taken before anything happens.
pub struct Harness {
    pub gateway: MockGateway,
    pub client: GatewayClient,
    pub events: broadcast::Receiver<GatewayEvent>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    pub async fn with_config(adjust: impl FnOnce(GatewayConfig) -> GatewayConfig) -> Self {
        pulse_test::setup_test_logging_default();
        let gateway = MockGateway::bind().await.unwrap();
        let client = GatewayClient::spawn(adjust(config(&gateway)));
        let events = client.subscribe();
        Self {
            gateway,
            client,
            events,
        }
    }

    /// Connect and answer with Hello; returns the session and the Identify.
    pub async fn open(&mut self, heartbeat_ms: u64) -> (MockSession, Value) {
        self.client.connect(fixtures::TEST_TOKEN).await.unwrap();
        let mut session = self.gateway.accept().await.unwrap();
        session.send_json(&fixtures::hello(heartbeat_ms)).await.unwrap();
        let identify = session.recv_op(2).await.unwrap();
        (session, identify)
    }

    /// Full handshake through `READY`.
    pub async fn connected(&mut self, heartbeat_ms: u64) -> MockSession {
        let (mut session, _identify) = self.open(heartbeat_ms).await;
        session.send_json(&fixtures::ready(1)).await.unwrap();
        self.wait_for_state(ConnectionState::Connected).await;
        session
    }

    pub async fn wait_for_state(&mut self, state: ConnectionState) {
        let found = next_event(&mut self.events, |event| {
            *event == GatewayEvent::StatusChanged(state)
        })
        .await;
        assert!(found.is_some(), "never reached {state}");
    }

    pub async fn wait_for_log(&mut self, needle: &str) -> GatewayEvent {
        next_event(&mut self.events, |event| {
            matches!(event, GatewayEvent::Log { message, .. } if message.contains(needle))
        })
        .await
        .unwrap_or_else(|| panic!("no log line containing {needle:?}"))
    }

    pub async fn state(&self) -> ConnectionState {
        self.client.snapshot().await.unwrap().state
    }
}
