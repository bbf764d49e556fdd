//! Per-client session bookkeeping.
//!
//! Holds the sequence number, the authenticated identity, and the last
//! known presence. All mutation goes through the methods here; the client
//! actor is the only owner.

use std::fmt;

use crate::presence::{Activity, Presence};

/// The user the gateway authenticated us as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Snowflake id of the user.
    pub user_id: String,
    /// Account name.
    pub username: String,
    /// Legacy discriminator (`"0"` for migrated accounts).
    pub discriminator: String,
}

impl SessionIdentity {
    /// `username#discriminator`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.username, self.discriminator)
    }
}

/// Mutable session state owned by one client.
#[derive(Debug, Default)]
pub struct SessionState {
    sequence: Option<u64>,
    session_id: Option<String>,
    identity: Option<SessionIdentity>,
    presence: Option<Presence>,
    current_activity: Option<Activity>,
}

impl SessionState {
    /// Empty state: no sequence, no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the `s` field of an inbound frame.
    ///
    /// `None` leaves the stored value untouched. Returns `true` when the
    /// sequence changed.
    pub fn observe_sequence(&mut self, s: Option<u64>) -> bool {
        match s {
            Some(seq) if self.sequence != Some(seq) => {
                self.sequence = Some(seq);
                true
            },
            _ => false,
        }
    }

    /// The sequence number the next heartbeat acknowledges.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Store the identity and session id from `READY`.
    pub fn establish(&mut self, identity: SessionIdentity, session_id: Option<String>) {
        self.identity = Some(identity);
        self.session_id = session_id;
    }

    /// Forget who we are authenticated as. The sequence number survives.
    pub fn clear_session(&mut self) {
        self.identity = None;
        self.session_id = None;
    }

    /// Authenticated identity, present only while connected.
    #[must_use]
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    /// Session id from the last `READY`.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether `user_id` is the authenticated user.
    #[must_use]
    pub fn is_self(&self, user_id: &str) -> bool {
        self.identity.as_ref().is_some_and(|id| id.user_id == user_id)
    }

    /// Last presence received from the gateway.
    #[must_use]
    pub fn presence(&self) -> Option<&Presence> {
        self.presence.as_ref()
    }

    /// The activity currently shown, whether reported by the gateway or
    /// set locally.
    #[must_use]
    pub fn current_activity(&self) -> Option<&Activity> {
        self.current_activity.as_ref()
    }

    /// Replace the presence; its first activity becomes current.
    pub fn set_presence(&mut self, presence: Presence) {
        self.current_activity = presence.current_activity().cloned();
        self.presence = Some(presence);
    }

    /// Record an activity we sent. Advisory until the gateway echoes it.
    pub fn record_local_activity(&mut self, activity: Option<Activity>) {
        self.current_activity = activity;
    }
}
