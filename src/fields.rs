//! Enumerations shared between the countdown engine and its front ends.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Coarse classification of how much time a task has left.
///
/// Drives the colour of a task's progress bar. The mapping to colours is
/// owned by the front end, not by the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Ample,
    Approaching,
    Overdue,
}

impl Urgency {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Urgency::Ample => "Ample",
            Urgency::Approaching => "Approaching",
            Urgency::Overdue => "Overdue",
        }
    }
}
