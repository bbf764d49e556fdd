//! Terminal styling for notifications and reports.

use colored::{ColoredString, Colorize};
use pulse_gateway::{ActivityKind, ConnectionState, Severity};

pub(crate) struct Theme;

impl Theme {
    pub(crate) fn header(text: &str) -> String {
        text.bold().cyan().to_string()
    }

    pub(crate) fn separator() -> String {
        "─".repeat(40).dimmed().to_string()
    }

    pub(crate) fn dimmed(text: &str) -> String {
        text.dimmed().to_string()
    }

    /// A log line, marked and colored by severity.
    pub(crate) fn severity(severity: Severity, text: &str) -> String {
        match severity {
            Severity::Info => format!("{} {}", "·".blue(), text),
            Severity::Success => format!("{} {}", "✓".green(), text),
            Severity::Warn => format!("{} {}", "!".yellow(), text.yellow()),
            Severity::Error => format!("{} {}", "✗".red(), text.red()),
        }
    }

    /// Connection state: green when connected, red when down, yellow in between.
    pub(crate) fn state(state: ConnectionState) -> ColoredString {
        match state {
            ConnectionState::Connected => state.as_str().green(),
            ConnectionState::Disconnected => state.as_str().red(),
            _ => state.as_str().yellow(),
        }
    }

    /// Glyph shown in front of an activity.
    pub(crate) fn activity_glyph(kind: ActivityKind) -> &'static str {
        match kind {
            ActivityKind::Playing => "🎮",
            ActivityKind::Streaming => "📺",
            ActivityKind::Listening => "🎵",
            ActivityKind::Watching => "👀",
            ActivityKind::Competing => "🏆",
            ActivityKind::Custom | ActivityKind::Unknown(_) => "❓",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_glyphs() {
        assert_eq!(Theme::activity_glyph(ActivityKind::Playing), "🎮");
        assert_eq!(Theme::activity_glyph(ActivityKind::Competing), "🏆");
        assert_eq!(Theme::activity_glyph(ActivityKind::Custom), "❓");
        assert_eq!(Theme::activity_glyph(ActivityKind::UNSPECIFIED), "❓");
    }
}
