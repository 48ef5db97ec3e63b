//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Urgency;

/// Overdue tasks
pub const RED: Color = Color::Rgb(255, 51, 51);
/// Tasks past the halfway mark
pub const AMBER: Color = Color::Rgb(255, 193, 7);
/// Tasks with ample time
pub const GREEN: Color = Color::Rgb(40, 167, 69);
/// Unfilled part of a progress bar
pub const TRACK: Color = Color::Rgb(204, 204, 204);

/// Progress bar colour for an urgency level.
pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Ample => GREEN,
        Urgency::Approaching => AMBER,
        Urgency::Overdue => RED,
    }
}
