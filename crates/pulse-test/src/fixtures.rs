//! Canned gateway frames.
//!
//! Every builder returns the full envelope (`op`, `d`, `s`, `t`) as a
//! `serde_json::Value`, ready for [`MockSession::send_json`].
//!
//! [`MockSession::send_json`]: crate::MockSession::send_json

use serde_json::{Value, json};

/// Token used by tests that do not care about its value.
pub const TEST_TOKEN: &str = "test-token";

/// User id the fixtures authenticate as.
pub const TEST_USER_ID: &str = "100000000000000001";

/// Username the fixtures authenticate as.
pub const TEST_USERNAME: &str = "pulse-tester";

/// Discriminator the fixtures authenticate as.
pub const TEST_DISCRIMINATOR: &str = "0420";

/// Hello (`op=10`) with the given heartbeat interval.
#[must_use]
pub fn hello(heartbeat_interval_ms: u64) -> Value {
    json!({
        "op": 10,
        "d": {"heartbeat_interval": heartbeat_interval_ms},
        "s": null,
        "t": null
    })
}

/// Dispatch (`op=0`) with event name, sequence, and data.
#[must_use]
pub fn dispatch(event: &str, seq: Option<u64>, data: Value) -> Value {
    json!({"op": 0, "d": data, "s": seq, "t": event})
}

/// `READY` for the test user with no embedded presence.
#[must_use]
pub fn ready(seq: u64) -> Value {
    dispatch(
        "READY",
        Some(seq),
        json!({
            "v": 10,
            "session_id": "test-session",
            "user": {
                "id": TEST_USER_ID,
                "username": TEST_USERNAME,
                "discriminator": TEST_DISCRIMINATOR
            }
        }),
    )
}

/// `READY` for the test user with an embedded presence.
#[must_use]
pub fn ready_with_presence(seq: u64, status: &str, activities: Value) -> Value {
    let mut frame = ready(seq);
    frame["d"]["user"]["presence"] = json!({"status": status, "activities": activities});
    frame
}

/// `PRESENCE_UPDATE` for `user_id`.
#[must_use]
pub fn presence_update(seq: Option<u64>, user_id: &str, status: &str, activities: Value) -> Value {
    dispatch(
        "PRESENCE_UPDATE",
        seq,
        json!({
            "user": {"id": user_id},
            "status": status,
            "activities": activities,
            "client_status": {"desktop": status}
        }),
    )
}

/// A single activity object as the gateway reports it.
#[must_use]
pub fn activity(kind: u64, name: &str) -> Value {
    json!({"name": name, "type": kind, "created_at": 1_700_000_000_000_u64})
}

/// An unrouted dispatch event, e.g. `GUILD_CREATE`.
#[must_use]
pub fn other_dispatch(seq: Option<u64>) -> Value {
    dispatch("GUILD_CREATE", seq, json!({"id": "1", "name": "guild"}))
}

/// Heartbeat request (`op=1`).
#[must_use]
pub fn heartbeat_request() -> Value {
    json!({"op": 1, "d": null})
}

/// Heartbeat ACK (`op=11`).
#[must_use]
pub fn heartbeat_ack() -> Value {
    json!({"op": 11})
}

/// Reconnect request (`op=7`).
#[must_use]
pub fn reconnect() -> Value {
    json!({"op": 7, "d": null})
}

/// Invalid session (`op=9`).
#[must_use]
pub fn invalid_session() -> Value {
    json!({"op": 9, "d": false})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_carries_test_identity() {
        let frame = ready(1);
        assert_eq!(frame["t"], "READY");
        assert_eq!(frame["d"]["user"]["id"], TEST_USER_ID);
    }

    #[test]
    fn ready_with_presence_embeds_user_presence() {
        let frame = ready_with_presence(1, "idle", json!([activity(0, "Chess")]));
        assert_eq!(frame["d"]["user"]["presence"]["status"], "idle");
        assert_eq!(frame["d"]["user"]["presence"]["activities"][0]["name"], "Chess");
    }

    #[test]
    fn dispatch_with_null_sequence() {
        let frame = other_dispatch(None);
        assert!(frame["s"].is_null());
    }
}
