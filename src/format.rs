//! Display helpers shared by the `show` command and the TUI.

use chrono::{DateTime, Local, TimeZone};

use crate::task::Task;

/// Format a due instant relative to `now`'s calendar day
/// ("today 18:00", "tomorrow 09:00", "Fri 16 Oct 17:00").
pub fn format_due<Tz: TimeZone>(due: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let days = (due.date_naive() - now.date_naive()).num_days();
    let time = due.format("%H:%M");
    match days {
        0 => format!("today {time}"),
        1 => format!("tomorrow {time}"),
        -1 => format!("yesterday {time}"),
        _ => due.format("%a %d %b %H:%M").to_string(),
    }
}

/// Render a progress fraction as a fixed-width bar. Values outside 0..=1 are
/// clamped for display only.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = filled_cells(progress, width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat('█').take(filled));
    bar.extend(std::iter::repeat('░').take(width - filled));
    bar
}

/// Number of `width` cells a progress bar fills.
pub fn filled_cells(progress: f64, width: usize) -> usize {
    ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width)
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], now: DateTime<Local>) {
    println!(
        "{:<3} {:<24} {:<18} {:<12} {:<12} {}",
        "#", "Name", "Due", "Progress", "Urgency", "Time left"
    );
    for (i, t) in tasks.iter().enumerate() {
        println!(
            "{:<3} {:<24} {:<18} {:<12} {:<12} {}",
            i,
            truncate(t.name(), 24),
            format_due(&t.due(), &now),
            progress_bar(t.progress(), 10),
            t.urgency().label(),
            t.time_left()
        );
    }
}
