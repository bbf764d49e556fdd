//! Heartbeat scheduler.
//!
//! Fires a tick every interval (the first one interval after `start`)
//! until stopped. The tick does not send anything itself; it hands control
//! back to the client actor, which decides whether a heartbeat can go out.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Lower bound on the period; a zero interval from the server would spin.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owns at most one periodic heartbeat timer.
#[derive(Debug, Default)]
pub struct HeartbeatScheduler {
    task: Option<JoinHandle<()>>,
    interval: Option<Duration>,
}

impl HeartbeatScheduler {
    /// A stopped scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `interval`, replacing any running timer.
    ///
    /// `on_tick` runs on each tick; returning `false` ends the timer (the
    /// receiving side has gone away).
    pub fn start<F>(&mut self, interval: Duration, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.stop();

        let period = interval.max(MIN_INTERVAL);
        let first = Instant::now().checked_add(period).unwrap_or_else(Instant::now);

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                trace!("Heartbeat tick");
                if !on_tick() {
                    debug!("Heartbeat receiver gone, timer exiting");
                    return;
                }
            }
        }));
        self.interval = Some(period);

        debug!(?period, "Heartbeat timer started");
    }

    /// Stop the timer. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Heartbeat timer stopped");
        }
        self.interval = None;
    }

    /// Whether a timer is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Period of the running timer.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl Drop for HeartbeatScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
