//! Dispatch router.
//!
//! Decodes the named dispatch events the client cares about and applies
//! them to the session. Everything else is ignored.

use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::events::{GatewayEvent, Severity};
use crate::presence;
use crate::protocol::{GatewayPayload, PresenceUpdateEvent, ReadyPayload, event};
use crate::session::{SessionIdentity, SessionState};

/// A decoded dispatch event.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// `READY`.
    Ready(ReadyPayload),
    /// `PRESENCE_UPDATE`.
    PresenceUpdate(PresenceUpdateEvent),
    /// Any other event name.
    Ignored(String),
}

/// Decode the data of an `op=0` payload by its event name.
///
/// # Errors
///
/// Returns [`DecodeError`] when a routed event's data has the wrong shape.
pub fn route(payload: &GatewayPayload) -> Result<Dispatch, DecodeError> {
    let name = payload.t.as_deref().unwrap_or_default();
    match name {
        event::READY => Ok(Dispatch::Ready(payload.data()?)),
        event::PRESENCE_UPDATE => Ok(Dispatch::PresenceUpdate(payload.data()?)),
        other => {
            trace!(event = other, "Ignoring dispatch event");
            Ok(Dispatch::Ignored(other.to_string()))
        },
    }
}

/// Apply `READY`: record who we are and any embedded presence.
pub fn apply_ready(session: &mut SessionState, ready: ReadyPayload) -> Vec<GatewayEvent> {
    let identity = SessionIdentity {
        user_id: ready.user.id,
        username: ready.user.username,
        discriminator: ready.user.discriminator,
    };
    session.establish(identity.clone(), ready.session_id);

    let mut events = vec![
        GatewayEvent::log(Severity::Success, format!("logged in as {}", identity.tag())),
        GatewayEvent::Authenticated(identity),
    ];
    if let Some(embedded) = ready.user.presence {
        events.extend(presence::apply(session, embedded));
    }
    events
}

/// Apply `PRESENCE_UPDATE` if it concerns the authenticated user.
pub fn apply_presence_update(
    session: &mut SessionState,
    update: PresenceUpdateEvent,
) -> Vec<GatewayEvent> {
    if !session.is_self(&update.user.id) {
        debug!(user_id = %update.user.id, "Presence update for another user ignored");
        return Vec::new();
    }
    presence::apply(session, update.presence)
}
