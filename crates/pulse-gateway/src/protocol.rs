//! Gateway protocol types, opcodes, and intent flags.
//!
//! Implements the JSON wire format of gateway API v10. Only the opcodes
//! and fields the client acts on are modelled; other dispatch payloads
//! stay opaque `serde_json::Value`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, GatewayResult};
use crate::presence::{Activity, PresencePayload, Status};

// ── Opcodes ──────────────────────────────────────────────────

/// Gateway opcodes.
pub mod opcode {
    /// Event dispatch (receive only).
    pub const DISPATCH: u8 = 0;
    /// Heartbeat (bidirectional).
    pub const HEARTBEAT: u8 = 1;
    /// Identify (send only).
    pub const IDENTIFY: u8 = 2;
    /// Presence update (send only).
    pub const PRESENCE_UPDATE: u8 = 3;
    /// Server requests reconnect (receive only).
    pub const RECONNECT: u8 = 7;
    /// Invalid session (receive only).
    pub const INVALID_SESSION: u8 = 9;
    /// Hello, carries the heartbeat interval (receive only).
    pub const HELLO: u8 = 10;
    /// Heartbeat ACK (receive only).
    pub const HEARTBEAT_ACK: u8 = 11;
}

/// Dispatch event names the client routes.
pub mod event {
    /// Handshake completed.
    pub const READY: &str = "READY";
    /// A user's presence changed.
    pub const PRESENCE_UPDATE: &str = "PRESENCE_UPDATE";
}

// ── Intent Flags ─────────────────────────────────────────────

/// `GUILD_PRESENCES`. Without it the gateway sends no presence updates.
pub const PRESENCE_INTENT: u32 = 1 << 8;

/// Default intents bitmask.
pub const DEFAULT_INTENTS: u32 = PRESENCE_INTENT;

// ── Endpoint ─────────────────────────────────────────────────

/// Public gateway host.
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg";

/// Gateway API version the codec speaks.
pub const API_VERSION: u8 = 10;

/// Append the pinned version and encoding query to a gateway base URL.
#[must_use]
pub fn endpoint(base: &str, version: u8) -> String {
    let base = base.trim_end_matches(['/', '?']);
    format!("{base}/?v={version}&encoding=json")
}

// ── Wire Types ───────────────────────────────────────────────

/// Raw gateway payload as received/sent over `WebSocket`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayPayload {
    /// Opcode for the payload.
    pub op: u8,
    /// Event data (opcode-dependent). Serialized as `null` when absent.
    #[serde(default)]
    pub d: Option<serde_json::Value>,
    /// Sequence number (dispatch events only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    /// Event name (dispatch events only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    fn outbound(op: u8, d: Option<serde_json::Value>) -> Self {
        Self {
            op,
            d,
            s: None,
            t: None,
        }
    }

    /// Decode `d` into a typed payload. A missing `d` decodes from `null`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if `d` does not match `T`.
    pub fn data<T: serde::de::DeserializeOwned>(&self) -> Result<T, DecodeError> {
        let value = self.d.clone().unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(value)?)
    }
}

/// Hello payload (`op=10`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds.
    pub heartbeat_interval: u64,
}

/// Client properties reported in Identify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system.
    pub os: String,
    /// Library or browser name.
    pub browser: String,
    /// Device name.
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: "pulse".to_string(),
            device: "pulse".to_string(),
        }
    }
}

/// Identify data (`op=2`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Authentication token.
    pub token: String,
    /// Client properties.
    pub properties: IdentifyProperties,
    /// Requested intents bitmask.
    pub intents: u32,
}

impl fmt::Debug for IdentifyPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifyPayload")
            .field("has_token", &!self.token.is_empty())
            .field("properties", &self.properties)
            .field("intents", &self.intents)
            .finish()
    }
}

/// Presence update data (`op=3`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdatePayload {
    /// Status to display.
    pub status: Status,
    /// Idle-since timestamp; always `null` from this client.
    pub since: Option<u64>,
    /// Activities, current first.
    pub activities: Vec<Activity>,
    /// AFK flag; always `false` from this client.
    pub afk: bool,
}

/// `READY` event data.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyPayload {
    /// Session id.
    #[serde(default)]
    pub session_id: Option<String>,
    /// The authenticated user.
    pub user: ReadyUser,
}

/// The user object inside `READY`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyUser {
    /// User id.
    pub id: String,
    /// Account name.
    pub username: String,
    /// Discriminator; migrated accounts report `"0"`.
    #[serde(default = "default_discriminator")]
    pub discriminator: String,
    /// Presence embedded by some gateways.
    #[serde(default)]
    pub presence: Option<PresencePayload>,
}

fn default_discriminator() -> String {
    "0".to_string()
}

/// `PRESENCE_UPDATE` event data.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceUpdateEvent {
    /// Whose presence changed.
    pub user: PresenceUser,
    /// The new presence.
    #[serde(flatten)]
    pub presence: PresencePayload,
}

/// Partial user object inside `PRESENCE_UPDATE`.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceUser {
    /// User id.
    pub id: String,
}

// ── Codec ────────────────────────────────────────────────────

/// Decode an inbound text frame.
///
/// # Errors
///
/// Returns [`DecodeError`] for invalid JSON or a missing/ill-typed `op`.
pub fn decode(text: &str) -> Result<GatewayPayload, DecodeError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode an outbound payload as JSON text.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(payload: &GatewayPayload) -> GatewayResult<String> {
    Ok(serde_json::to_string(payload)?)
}

/// Build an Identify payload (`op=2`).
#[must_use]
pub fn build_identify(token: &str, intents: u32, properties: &IdentifyProperties) -> GatewayPayload {
    GatewayPayload::outbound(
        opcode::IDENTIFY,
        Some(serde_json::json!({
            "token": token,
            "properties": {
                "os": properties.os,
                "browser": properties.browser,
                "device": properties.device,
            },
            "intents": intents,
        })),
    )
}

/// Build a Heartbeat payload (`op=1`) acknowledging `sequence`.
#[must_use]
pub fn build_heartbeat(sequence: Option<u64>) -> GatewayPayload {
    GatewayPayload::outbound(opcode::HEARTBEAT, Some(serde_json::Value::from(sequence)))
}

/// Build a Presence Update payload (`op=3`) showing the user online with
/// the given activity, or none.
///
/// # Errors
///
/// Returns an error if the activity cannot be serialized.
pub fn build_presence_update(activity: Option<&Activity>) -> GatewayResult<GatewayPayload> {
    let data = PresenceUpdatePayload {
        status: Status::Online,
        since: None,
        activities: activity.cloned().into_iter().collect(),
        afk: false,
    };
    Ok(GatewayPayload::outbound(
        opcode::PRESENCE_UPDATE,
        Some(serde_json::to_value(data)?),
    ))
}
