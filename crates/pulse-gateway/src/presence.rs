//! Presence model: statuses, activities, and how an inbound presence is
//! applied to the session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GatewayError;
use crate::events::{GatewayEvent, Severity};
use crate::session::SessionState;

// ── Status ───────────────────────────────────────────────────

/// Online status of a user.
///
/// Serialized as the gateway's lowercase string. Strings the client does
/// not know are preserved in [`Status::Unknown`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// `online`
    Online,
    /// `idle`
    Idle,
    /// `dnd`
    DoNotDisturb,
    /// `offline`
    Offline,
    /// `invisible`
    Invisible,
    /// Any other status string.
    Unknown(String),
}

impl Status {
    /// The wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::DoNotDisturb => "dnd",
            Self::Offline => "offline",
            Self::Invisible => "invisible",
            Self::Unknown(raw) => raw,
        }
    }

    /// Human-readable label. Invisible users appear offline to others.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::DoNotDisturb => "do not disturb",
            Self::Offline | Self::Invisible => "offline",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "online" => Self::Online,
            "idle" => Self::Idle,
            "dnd" => Self::DoNotDisturb,
            "offline" => Self::Offline,
            "invisible" => Self::Invisible,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Activity ─────────────────────────────────────────────────

/// Activity type, serialized as the gateway's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum ActivityKind {
    /// `0`
    Playing,
    /// `1`
    Streaming,
    /// `2`
    Listening,
    /// `3`
    Watching,
    /// `4`
    Custom,
    /// `5`
    Competing,
    /// Any other code.
    Unknown(u64),
}

impl ActivityKind {
    /// Stand-in for an inbound activity whose `type` is missing or not an
    /// integer.
    pub const UNSPECIFIED: Self = Self::Unknown(u64::MAX);

    /// Integer code on the wire.
    #[must_use]
    pub fn code(self) -> u64 {
        match self {
            Self::Playing => 0,
            Self::Streaming => 1,
            Self::Listening => 2,
            Self::Watching => 3,
            Self::Custom => 4,
            Self::Competing => 5,
            Self::Unknown(code) => code,
        }
    }

    /// Verb used when rendering the activity, e.g. `Listening to Radio`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Streaming => "Streaming",
            Self::Listening => "Listening to",
            Self::Watching => "Watching",
            Self::Custom => "Custom",
            Self::Competing => "Competing in",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<u64> for ActivityKind {
    fn from(code: u64) -> Self {
        match code {
            0 => Self::Playing,
            1 => Self::Streaming,
            2 => Self::Listening,
            3 => Self::Watching,
            4 => Self::Custom,
            5 => Self::Competing,
            other => Self::Unknown(other),
        }
    }
}

impl From<ActivityKind> for u64 {
    fn from(kind: ActivityKind) -> Self {
        kind.code()
    }
}

impl FromStr for ActivityKind {
    type Err = GatewayError;

    /// Accepts either a name (`playing`, `listening`, ...) or a code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "playing" | "play" => Ok(Self::Playing),
            "streaming" | "stream" => Ok(Self::Streaming),
            "listening" | "listen" => Ok(Self::Listening),
            "watching" | "watch" => Ok(Self::Watching),
            "custom" => Ok(Self::Custom),
            "competing" | "compete" => Ok(Self::Competing),
            other => other
                .parse::<u64>()
                .map(Self::from)
                .map_err(|_| GatewayError::InvalidActivity(format!("unknown activity type: {s}"))),
        }
    }
}

/// One rich-presence entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity name, e.g. the game title.
    #[serde(default)]
    pub name: String,
    /// Activity type. A missing or malformed `type` decodes as
    /// [`ActivityKind::UNSPECIFIED`].
    #[serde(
        rename = "type",
        default = "unspecified_kind",
        deserialize_with = "lenient_kind"
    )]
    pub kind: ActivityKind,
    /// First detail line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Second detail line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Activity {
    /// Create an activity with no detail lines.
    pub fn new(kind: ActivityKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            details: None,
            state: None,
        }
    }

    /// Set the `details` line. Blank input leaves it unset.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = non_blank(details.into());
        self
    }

    /// Set the `state` line. Blank input leaves it unset.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = non_blank(state.into());
        self
    }

    /// Trim every field and drop blank detail lines.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            kind: self.kind,
            details: self.details.and_then(non_blank),
            state: self.state.and_then(non_blank),
        }
    }

    /// Reject activities an outbound presence update cannot carry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidActivity`] if the name is empty after
    /// trimming.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.name.trim().is_empty() {
            return Err(GatewayError::InvalidActivity(
                "activity name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `"<details> - <state>"`, or whichever of the two is present.
    #[must_use]
    pub fn detail_line(&self) -> Option<String> {
        match (self.details.as_deref(), self.state.as_deref()) {
            (Some(details), Some(state)) => Some(format!("{details} - {state}")),
            (Some(line), None) | (None, Some(line)) => Some(line.to_string()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.name)
    }
}

fn unspecified_kind() -> ActivityKind {
    ActivityKind::UNSPECIFIED
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<ActivityKind, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .map_or(ActivityKind::UNSPECIFIED, ActivityKind::from))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ── Presence ─────────────────────────────────────────────────

/// Status plus ordered activities. Only the first activity is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    /// Online status.
    pub status: Status,
    /// Activities in gateway order.
    pub activities: Vec<Activity>,
}

impl Presence {
    /// The current (first) activity, if any.
    #[must_use]
    pub fn current_activity(&self) -> Option<&Activity> {
        self.activities.first()
    }
}

/// Presence as it appears inside `READY.user.presence` and
/// `PRESENCE_UPDATE`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresencePayload {
    /// Status string; absent means unknown.
    #[serde(default)]
    pub status: Option<Status>,
    /// Activities; absent or `null` means none.
    #[serde(default)]
    pub activities: Option<Vec<Activity>>,
}

impl From<PresencePayload> for Presence {
    fn from(payload: PresencePayload) -> Self {
        Self {
            status: payload
                .status
                .unwrap_or_else(|| Status::Unknown("unknown".to_string())),
            activities: payload.activities.unwrap_or_default(),
        }
    }
}

/// Record an inbound presence on the session and return the notifications
/// it produces.
///
/// Always yields `PresenceChanged` followed by `ActivityChanged` (with the
/// first activity, or `None` when the list is empty) and a log line.
pub fn apply(session: &mut SessionState, payload: PresencePayload) -> Vec<GatewayEvent> {
    let presence = Presence::from(payload);
    let status = presence.status.clone();
    let current = presence.current_activity().cloned();
    let count = presence.activities.len();

    session.set_presence(presence);

    vec![
        GatewayEvent::PresenceChanged(status.clone()),
        GatewayEvent::ActivityChanged(current),
        GatewayEvent::log(
            Severity::Info,
            format!("presence updated: {}, {count} activities", status.label()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Status ───────────────────────────────────────────────

    #[test]
    fn status_parses_known_strings() {
        assert_eq!(Status::from("online".to_string()), Status::Online);
        assert_eq!(Status::from("dnd".to_string()), Status::DoNotDisturb);
        assert_eq!(Status::from("invisible".to_string()), Status::Invisible);
    }

    #[test]
    fn status_unknown_passes_through() {
        let status: Status = serde_json::from_str("\"streaming-ish\"").unwrap();
        assert_eq!(status, Status::Unknown("streaming-ish".into()));
        assert_eq!(status.label(), "streaming-ish");
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"streaming-ish\"");
    }

    #[test]
    fn invisible_is_labelled_offline() {
        assert_eq!(Status::Invisible.label(), "offline");
        assert_eq!(Status::Invisible.as_str(), "invisible");
        assert_eq!(Status::DoNotDisturb.label(), "do not disturb");
    }

    // ── ActivityKind ─────────────────────────────────────────

    #[test]
    fn activity_kind_labels() {
        assert_eq!(ActivityKind::Playing.label(), "Playing");
        assert_eq!(ActivityKind::Listening.label(), "Listening to");
        assert_eq!(ActivityKind::Competing.label(), "Competing in");
        assert_eq!(ActivityKind::from(42).label(), "unknown");
    }

    #[test]
    fn activity_kind_serializes_as_integer() {
        let json = serde_json::to_string(&ActivityKind::Watching).unwrap();
        assert_eq!(json, "3");
        let kind: ActivityKind = serde_json::from_str("99").unwrap();
        assert_eq!(kind, ActivityKind::Unknown(99));
        assert_eq!(kind.code(), 99);
    }

    #[test]
    fn activity_kind_from_str_accepts_names_and_codes() {
        assert_eq!("listening".parse::<ActivityKind>().unwrap(), ActivityKind::Listening);
        assert_eq!("Watch".parse::<ActivityKind>().unwrap(), ActivityKind::Watching);
        assert_eq!("5".parse::<ActivityKind>().unwrap(), ActivityKind::Competing);
        assert!("dancing".parse::<ActivityKind>().is_err());
    }

    // ── Activity ─────────────────────────────────────────────

    #[test]
    fn activity_without_type_decodes_as_unspecified() {
        let activity: Activity = serde_json::from_str(r#"{"name": "Thing"}"#).unwrap();
        assert_eq!(activity.kind, ActivityKind::UNSPECIFIED);
        assert_eq!(activity.kind.label(), "unknown");
        assert_eq!(activity.to_string(), "unknown Thing");
    }

    #[test]
    fn activity_with_malformed_type_decodes_as_unspecified() {
        for raw in [r#"{"name": "A", "type": null}"#, r#"{"name": "A", "type": "0"}"#] {
            let activity: Activity = serde_json::from_str(raw).unwrap();
            assert_eq!(activity.kind, ActivityKind::UNSPECIFIED, "{raw}");
        }
        let activity: Activity = serde_json::from_str(r#"{"name": "A", "type": 7}"#).unwrap();
        assert_eq!(activity.kind, ActivityKind::Unknown(7));
    }

    #[test]
    fn activity_omits_absent_detail_lines() {
        let activity = Activity::new(ActivityKind::Playing, "Chess");
        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Chess", "type": 0}));
    }

    #[test]
    fn activity_builders_drop_blank_lines() {
        let activity = Activity::new(ActivityKind::Listening, "Radio")
            .with_details("  ")
            .with_state(" Track 3 ");
        assert_eq!(activity.details, None);
        assert_eq!(activity.state.as_deref(), Some("Track 3"));
    }

    #[test]
    fn activity_validate_rejects_blank_name() {
        assert!(Activity::new(ActivityKind::Playing, "   ").validate().is_err());
        assert!(Activity::new(ActivityKind::Playing, "Go").validate().is_ok());
    }

    #[test]
    fn activity_detail_line_joins_with_dash() {
        let activity = Activity::new(ActivityKind::Playing, "Chess")
            .with_details("Ranked")
            .with_state("Move 12");
        assert_eq!(activity.detail_line().as_deref(), Some("Ranked - Move 12"));

        let only_state = Activity::new(ActivityKind::Playing, "Chess").with_state("Lobby");
        assert_eq!(only_state.detail_line().as_deref(), Some("Lobby"));

        assert_eq!(Activity::new(ActivityKind::Playing, "Chess").detail_line(), None);
    }

    #[test]
    fn inbound_activity_tolerates_null_fields() {
        let activity: Activity = serde_json::from_value(serde_json::json!({
            "name": "Spotify",
            "type": 2,
            "details": null,
            "state": "Some Artist",
            "created_at": 1_700_000_000_000_u64
        }))
        .unwrap();
        assert_eq!(activity.kind, ActivityKind::Listening);
        assert_eq!(activity.details, None);
        assert_eq!(activity.to_string(), "Listening to Spotify");
    }

    // ── apply ────────────────────────────────────────────────

    #[test]
    fn apply_records_first_activity_as_current() {
        let mut session = SessionState::new();
        let payload: PresencePayload = serde_json::from_value(serde_json::json!({
            "status": "idle",
            "activities": [
                {"name": "First", "type": 0},
                {"name": "Second", "type": 3}
            ]
        }))
        .unwrap();

        let events = apply(&mut session, payload);

        assert_eq!(events[0], GatewayEvent::PresenceChanged(Status::Idle));
        assert_eq!(
            events[1],
            GatewayEvent::ActivityChanged(Some(Activity::new(ActivityKind::Playing, "First")))
        );
        assert!(matches!(&events[2], GatewayEvent::Log { message, .. } if message.contains("2 activities")));
        assert_eq!(session.current_activity().map(|a| a.name.as_str()), Some("First"));
    }

    #[test]
    fn apply_empty_activities_clears_current() {
        let mut session = SessionState::new();
        session.record_local_activity(Some(Activity::new(ActivityKind::Playing, "Old")));

        let payload: PresencePayload =
            serde_json::from_value(serde_json::json!({"status": "online", "activities": null}))
                .unwrap();
        let events = apply(&mut session, payload);

        assert_eq!(events[1], GatewayEvent::ActivityChanged(None));
        assert!(session.current_activity().is_none());
    }

    #[test]
    fn apply_missing_status_is_unknown() {
        let mut session = SessionState::new();
        let events = apply(&mut session, PresencePayload::default());
        assert_eq!(
            events[0],
            GatewayEvent::PresenceChanged(Status::Unknown("unknown".into()))
        );
    }
}
