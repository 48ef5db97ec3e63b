//! A cancellable repeating schedule polled from the event loop.
//!
//! The timer never runs anything by itself. The owner asks it on every pass
//! through its loop whether a tick is due, which keeps every recomputation on
//! the caller's thread and in order with user actions.

use chrono::{DateTime, Duration, Local};

/// Milliseconds between two recomputations of the task list.
pub const REFRESH_INTERVAL_MS: i64 = 1_000;

/// Repeating deadline with an explicit start/stop pair.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Option<DateTime<Local>>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        RefreshTimer {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the timer so the first tick is due one interval after `now`.
    ///
    /// Restarting an active timer pushes its deadline out.
    pub fn start(&mut self, now: DateTime<Local>) {
        self.next_due = Some(now + self.interval);
    }

    /// Disarm the timer. Returns whether it was active.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Whether a tick is due at `now`. Consumes the deadline and schedules the
    /// next one from `now`, so a late poll yields a single tick rather than a
    /// burst.
    pub fn poll(&mut self, now: DateTime<Local>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        RefreshTimer::new(Duration::milliseconds(REFRESH_INTERVAL_MS))
    }
}
