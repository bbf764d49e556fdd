//! Rendering of client notifications and snapshots for the terminal.

use pulse_gateway::{Activity, GatewayEvent, Severity, Snapshot};

use crate::theme::Theme;

/// One line per notification.
pub(crate) fn event_line(event: &GatewayEvent) -> String {
    match event {
        GatewayEvent::StatusChanged(state) => {
            format!("{} {}", Theme::dimmed("[status]"), Theme::state(*state))
        },
        GatewayEvent::Authenticated(identity) => Theme::severity(
            Severity::Success,
            &format!("authenticated as {}", identity.tag()),
        ),
        GatewayEvent::PresenceChanged(status) => {
            Theme::severity(Severity::Info, &format!("presence: {}", status.label()))
        },
        GatewayEvent::ActivityChanged(activity) => Theme::severity(
            Severity::Info,
            &format!("activity: {}", activity_summary(activity.as_ref())),
        ),
        GatewayEvent::Log { message, severity } => Theme::severity(*severity, message),
    }
}

/// Multi-line report for the `status` command.
pub(crate) fn snapshot_report(snapshot: &Snapshot) -> String {
    let mut lines = vec![
        Theme::header("Pulse status"),
        Theme::separator(),
        format!("  connection: {}", Theme::state(snapshot.state)),
    ];

    let user = snapshot
        .identity
        .as_ref()
        .map_or_else(|| "not logged in".to_owned(), |identity| identity.tag());
    lines.push(format!("  user:       {user}"));

    let status = snapshot
        .presence
        .as_ref()
        .map_or("unknown", |presence| presence.status.label());
    lines.push(format!("  status:     {status}"));
    lines.push(format!(
        "  activity:   {}",
        activity_summary(snapshot.current_activity.as_ref())
    ));
    if let Some(line) = snapshot
        .current_activity
        .as_ref()
        .and_then(Activity::detail_line)
    {
        lines.push(format!("              {line}"));
    }

    if let Some(sequence) = snapshot.sequence {
        lines.push(Theme::dimmed(&format!("  sequence:   {sequence}")));
    }
    if snapshot.reconnect_pending {
        lines.push(Theme::severity(Severity::Warn, "reconnect pending"));
    }
    lines.join("\n")
}

fn activity_summary(activity: Option<&Activity>) -> String {
    activity.map_or_else(
        || "none".to_owned(),
        |activity| format!("{} {activity}", Theme::activity_glyph(activity.kind)),
    )
}

#[cfg(test)]
mod tests {
    use pulse_gateway::{ActivityKind, ConnectionState, Presence, SessionIdentity, Status};

    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            state: ConnectionState::Connected,
            identity: Some(SessionIdentity {
                user_id: "1".to_owned(),
                username: "ada".to_owned(),
                discriminator: "0001".to_owned(),
            }),
            session_id: Some("s".to_owned()),
            presence: Some(Presence {
                status: Status::DoNotDisturb,
                activities: Vec::new(),
            }),
            current_activity: Some(
                Activity::new(ActivityKind::Playing, "Chess")
                    .with_details("Ranked")
                    .with_state("Winning"),
            ),
            sequence: Some(4),
            heartbeat_active: true,
            reconnect_pending: false,
            has_token: true,
        }
    }

    #[test]
    fn event_lines() {
        plain();
        let line = event_line(&GatewayEvent::ActivityChanged(Some(Activity::new(
            ActivityKind::Listening,
            "Radio",
        ))));
        assert!(line.ends_with("activity: 🎵 Listening to Radio"));

        let line = event_line(&GatewayEvent::ActivityChanged(Some(Activity::new(
            ActivityKind::UNSPECIFIED,
            "Thing",
        ))));
        assert!(line.ends_with("activity: ❓ unknown Thing"));

        let line = event_line(&GatewayEvent::ActivityChanged(None));
        assert!(line.ends_with("activity: none"));

        let line = event_line(&GatewayEvent::PresenceChanged(Status::Invisible));
        assert!(line.ends_with("presence: offline"));

        let line = event_line(&GatewayEvent::log(Severity::Error, "bad token"));
        assert!(line.contains("bad token"));
    }

    #[test]
    fn report_lists_identity_and_activity() {
        plain();
        let report = snapshot_report(&snapshot());
        assert!(report.contains("connection: connected"));
        assert!(report.contains("user:       ada#0001"));
        assert!(report.contains("status:     do not disturb"));
        assert!(report.contains("activity:   🎮 Playing Chess"));
        assert!(report.contains("Ranked - Winning"));
        assert!(report.contains("sequence:   4"));
    }

    #[test]
    fn report_when_logged_out() {
        plain();
        let snapshot = Snapshot {
            state: ConnectionState::Disconnected,
            identity: None,
            presence: None,
            current_activity: None,
            sequence: None,
            reconnect_pending: true,
            ..snapshot()
        };
        let report = snapshot_report(&snapshot);
        assert!(report.contains("not logged in"));
        assert!(report.contains("activity:   none"));
        assert!(report.contains("reconnect pending"));
        assert!(!report.contains("sequence"));
    }
}
