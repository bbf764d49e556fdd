//! Notifications emitted to observers of a gateway client.
//!
//! Observers subscribe through [`GatewayClient::subscribe`] and receive
//! every event published after subscribing. Slow observers lag rather than
//! block the client.
//!
//! [`GatewayClient::subscribe`]: crate::GatewayClient::subscribe

use tokio::sync::broadcast;
use tracing::{error, info, trace, warn};

use crate::machine::ConnectionState;
use crate::presence::{Activity, Status};
use crate::session::SessionIdentity;

/// Severity of a protocol log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Routine progress.
    Info,
    /// A step completed, e.g. login.
    Success,
    /// Recoverable anomaly.
    Warn,
    /// Failure the operator should act on.
    Error,
}

impl Severity {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// An observable change in a gateway client.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// The connection state changed.
    StatusChanged(ConnectionState),
    /// `READY` was accepted.
    Authenticated(SessionIdentity),
    /// Our own presence status changed.
    PresenceChanged(Status),
    /// Our current activity changed (`None` means cleared).
    ActivityChanged(Option<Activity>),
    /// Human-readable protocol log line.
    Log {
        /// Message text.
        message: String,
        /// Severity.
        severity: Severity,
    },
}

impl GatewayEvent {
    /// Build a [`GatewayEvent::Log`].
    pub fn log(severity: Severity, message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
            severity,
        }
    }

    /// Short name of the variant, used in tracing fields.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StatusChanged(_) => "status_changed",
            Self::Authenticated(_) => "authenticated",
            Self::PresenceChanged(_) => "presence_changed",
            Self::ActivityChanged(_) => "activity_changed",
            Self::Log { .. } => "log",
        }
    }
}

/// Fan-out of [`GatewayEvent`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub(crate) struct Notifier {
    sender: broadcast::Sender<GatewayEvent>,
}

impl Notifier {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Log events are mirrored to `tracing`.
    pub(crate) fn publish(&self, event: GatewayEvent) {
        if let GatewayEvent::Log { message, severity } = &event {
            match severity {
                Severity::Info | Severity::Success => info!(target: "pulse_gateway::protocol", "{message}"),
                Severity::Warn => warn!(target: "pulse_gateway::protocol", "{message}"),
                Severity::Error => error!(target: "pulse_gateway::protocol", "{message}"),
            }
        }
        let event_type = event.event_type();
        // No subscribers is not an error.
        let receivers = self.sender.send(event).unwrap_or(0);
        trace!(event_type, receivers, "Published gateway event");
    }

    pub(crate) fn publish_all(&self, events: impl IntoIterator<Item = GatewayEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    pub(crate) fn log(&self, severity: Severity, message: impl Into<String>) {
        self.publish(GatewayEvent::log(severity, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_silent() {
        let notifier = Notifier::new(4);
        notifier.log(Severity::Info, "nobody listening");
    }

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let notifier = Notifier::new(8);
        let mut rx = notifier.subscribe();

        notifier.publish(GatewayEvent::StatusChanged(ConnectionState::Connecting));
        notifier.log(Severity::Success, "logged in");

        assert_eq!(
            rx.recv().await.unwrap(),
            GatewayEvent::StatusChanged(ConnectionState::Connecting)
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            GatewayEvent::log(Severity::Success, "logged in")
        );
    }

    #[test]
    fn event_type_names() {
        assert_eq!(GatewayEvent::ActivityChanged(None).event_type(), "activity_changed");
        assert_eq!(GatewayEvent::log(Severity::Warn, "x").event_type(), "log");
        assert_eq!(Severity::Warn.as_str(), "warn");
    }
}
