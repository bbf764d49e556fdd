//! Termination handling and the reconnect policy.

mod common;

use std::time::Duration;

use common::{Harness, QUIET_HEARTBEAT_MS, RECONNECT_DELAY};
use pulse_gateway::prelude::*;
use pulse_test::{fixtures, next_event};

#[tokio::test]
async fn server_close_reconnects_after_delay() {
    let mut h = Harness::new().await;
    let mut session = h.connected(QUIET_HEARTBEAT_MS).await;

    session.close(4000).await.unwrap();
    h.wait_for_log("connection closed (code 4000)").await;
    h.wait_for_state(ConnectionState::Disconnected).await;

    let snapshot = h.client.snapshot().await.unwrap();
    assert!(snapshot.identity.is_none());
    assert!(!snapshot.heartbeat_active);

    // No operator action: the policy reconnects on its own.
    let mut fresh = h.gateway.accept().await.unwrap();
    fresh.send_json(&fixtures::hello(QUIET_HEARTBEAT_MS)).await.unwrap();
    let identify = fresh.recv_op(2).await.unwrap();
    assert_eq!(identify["d"]["token"], fixtures::TEST_TOKEN);
}

#[tokio::test]
async fn dropped_socket_counts_as_termination() {
    let mut h = Harness::new().await;
    let session = h.connected(QUIET_HEARTBEAT_MS).await;

    drop(session);
    h.wait_for_state(ConnectionState::Disconnected).await;
    assert!(h.gateway.accept().await.is_ok());
}

#[tokio::test]
async fn sequence_survives_reconnect() {
    let mut h = Harness::new().await;
    let mut session = h.connected(QUIET_HEARTBEAT_MS).await;
    session.send_json(&fixtures::other_dispatch(Some(9))).await.unwrap();
    session.close(4000).await.unwrap();

    let mut fresh = h.gateway.accept().await.unwrap();
    fresh.send_json(&fixtures::hello(QUIET_HEARTBEAT_MS)).await.unwrap();
    fresh.recv_op(2).await.unwrap();
    fresh.send_json(&fixtures::heartbeat_request()).await.unwrap();

    let beat = fresh.recv_op(1).await.unwrap();
    assert_eq!(beat["d"], 9);
}

#[tokio::test]
async fn reconnect_request_closes_then_reconnects() {
    let mut h = Harness::new().await;
    let mut session = h.connected(QUIET_HEARTBEAT_MS).await;

    session.send_json(&fixtures::reconnect()).await.unwrap();
    h.wait_for_state(ConnectionState::Terminating).await;
    assert!(session.closed_within(Duration::from_secs(1)).await);
    h.wait_for_state(ConnectionState::Disconnected).await;

    let mut fresh = h.gateway.accept().await.unwrap();
    fresh.send_json(&fixtures::hello(QUIET_HEARTBEAT_MS)).await.unwrap();
    assert!(fresh.recv_op(2).await.is_ok());
}

#[tokio::test]
async fn invalid_session_does_not_reconnect() {
    let mut h = Harness::new().await;
    let mut session = h.connected(QUIET_HEARTBEAT_MS).await;

    session.send_json(&fixtures::invalid_session()).await.unwrap();

    let failure = next_event(&mut h.events, |e| {
        matches!(e, GatewayEvent::Log { severity: Severity::Error, .. })
    })
    .await;
    assert!(failure.is_some(), "authentication failure not surfaced");
    h.wait_for_state(ConnectionState::Disconnected).await;

    assert!(session.closed_within(Duration::from_secs(1)).await);
    assert!(
        !h.gateway
            .is_contacted_within(RECONNECT_DELAY.saturating_mul(6))
            .await
    );

    let snapshot = h.client.snapshot().await.unwrap();
    assert_eq!(snapshot.state, ConnectionState::Disconnected);
    assert!(!snapshot.reconnect_pending);
    assert!(snapshot.identity.is_none());
}

#[tokio::test]
async fn operator_can_reconnect_after_invalid_session() {
    let mut h = Harness::new().await;
    let mut session = h.connected(QUIET_HEARTBEAT_MS).await;
    session.send_json(&fixtures::invalid_session()).await.unwrap();
    h.wait_for_state(ConnectionState::Disconnected).await;

    h.client.connect("fresh-token").await.unwrap();
    let mut fresh = h.gateway.accept().await.unwrap();
    fresh.send_json(&fixtures::hello(QUIET_HEARTBEAT_MS)).await.unwrap();
    let identify = fresh.recv_op(2).await.unwrap();
    assert_eq!(identify["d"]["token"], "fresh-token");
}

#[tokio::test]
async fn disabled_policy_stays_disconnected() {
    let mut h = Harness::with_config(|config| GatewayConfig {
        reconnect: ReconnectPolicy::disabled(),
        ..config
    })
    .await;
    let mut session = h.connected(QUIET_HEARTBEAT_MS).await;

    session.close(4000).await.unwrap();
    h.wait_for_state(ConnectionState::Disconnected).await;
    assert!(
        !h.gateway
            .is_contacted_within(Duration::from_millis(300))
            .await
    );
    assert_eq!(h.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn disconnect_cancels_pending_reconnect() {
    let mut h = Harness::with_config(|config| GatewayConfig {
        reconnect: ReconnectPolicy::new(Duration::from_millis(300)),
        ..config
    })
    .await;
    let mut session = h.connected(QUIET_HEARTBEAT_MS).await;

    session.close(4000).await.unwrap();
    h.wait_for_log("reconnecting in 300 ms").await;
    assert!(h.client.snapshot().await.unwrap().reconnect_pending);

    h.client.disconnect().await.unwrap();
    assert!(!h.client.snapshot().await.unwrap().reconnect_pending);
    assert!(
        !h.gateway
            .is_contacted_within(Duration::from_millis(600))
            .await
    );
}

#[tokio::test]
async fn unreachable_gateway_keeps_retrying() {
    // Retries are unbounded: every failed attempt schedules another.
    let h = Harness::new().await;
    let url = h.gateway.url();
    drop(h.gateway);

    let client = GatewayClient::spawn(GatewayConfig {
        reconnect: ReconnectPolicy::new(Duration::from_millis(20)),
        ..GatewayConfig::with_url(url)
    });
    let mut events = client.subscribe();
    client.connect(fixtures::TEST_TOKEN).await.unwrap();

    let mut attempts = 0_u32;
    while attempts < 3 {
        let connecting = next_event(&mut events, |e| {
            *e == GatewayEvent::StatusChanged(ConnectionState::Connecting)
        })
        .await;
        assert!(connecting.is_some(), "stopped retrying after {attempts} attempts");
        attempts = attempts.saturating_add(1);
    }
    client.disconnect().await.unwrap();
}
