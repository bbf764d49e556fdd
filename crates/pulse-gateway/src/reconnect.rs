//! Reconnect policy and the single-shot retry timer.
//!
//! After an unplanned termination the client retries once after a fixed
//! delay, provided the operator left a token behind. There is no attempt
//! counter: every termination schedules exactly one new attempt.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Default delay before a retry.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Decides whether and when to retry after a termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    enabled: bool,
    delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAY)
    }
}

impl ReconnectPolicy {
    /// Retry after `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            enabled: true,
            delay,
        }
    }

    /// Never retry.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    /// Whether retries are enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Delay between termination and retry.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Delay before the next attempt, or `None` if no attempt should be
    /// made. A blank or missing token means the operator has nothing to
    /// reconnect with.
    #[must_use]
    pub fn next_attempt(&self, pending_token: Option<&str>) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        pending_token
            .filter(|token| !token.trim().is_empty())
            .map(|_| self.delay)
    }
}

/// Holds the one pending retry, if any.
///
/// Each scheduled retry gets a fresh ticket. A retry that fires after being
/// cancelled carries a ticket that no longer matches and is discarded.
#[derive(Debug, Default)]
pub(crate) struct ReconnectTimer {
    task: Option<JoinHandle<()>>,
    ticket: Option<u64>,
    next_ticket: u64,
}

impl ReconnectTimer {
    /// Schedule `on_fire(ticket)` after `delay`, replacing any pending retry.
    pub(crate) fn schedule<F>(&mut self, delay: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        let ticket = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.ticket = Some(ticket);
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(ticket);
        }));
        debug!(ticket, ?delay, "Reconnect scheduled");
        ticket
    }

    /// Cancel the pending retry. Safe to call when nothing is pending.
    pub(crate) fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Pending reconnect cancelled");
        }
        self.ticket = None;
    }

    /// Consume `ticket` if it is the pending one.
    pub(crate) fn claim(&mut self, ticket: u64) -> bool {
        if self.ticket == Some(ticket) {
            self.ticket = None;
            self.task = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.ticket.is_some()
    }
}

impl Drop for ReconnectTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
