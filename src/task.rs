//! Task data structure.
//!
//! A `Task` pairs a name and due instant, fixed at creation, with the
//! countdown fields derived from them. Only [`Task::refresh`] changes the
//! derived fields.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::fields::Urgency;
use crate::metrics::Metrics;

/// A named item with a deadline and its current countdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    name: String,
    due: DateTime<Local>,
    time_left: String,
    progress: f64,
    urgency: Urgency,
}

impl Task {
    /// Create a task with its derived fields computed at `now`.
    pub fn new(name: impl Into<String>, due: DateTime<Local>, now: DateTime<Local>) -> Self {
        let Metrics {
            time_left,
            progress,
            urgency,
        } = Metrics::compute(&due, &now);
        Task {
            name: name.into(),
            due,
            time_left,
            progress,
            urgency,
        }
    }

    /// Recompute the derived fields as seen at `now`.
    pub fn refresh(&mut self, now: DateTime<Local>) {
        let metrics = Metrics::compute(&self.due, &now);
        self.time_left = metrics.time_left;
        self.progress = metrics.progress;
        self.urgency = metrics.urgency;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn due(&self) -> DateTime<Local> {
        self.due
    }

    /// Countdown text, or "Time is up" once due.
    pub fn time_left(&self) -> &str {
        &self.time_left
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }
}
