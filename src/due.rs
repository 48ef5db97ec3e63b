//! Due date input parsing.
//!
//! Turns what a user types ("in 2h", "tomorrow 09:00", "fri 17:00",
//! "2026-12-25 18:30") into an instant. Only instants strictly after `now`
//! are accepted, since a countdown to the past is never wanted.
//!
//! A day without a time keeps the current wall-clock time, so "tomorrow" is
//! this time tomorrow.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use thiserror::Error;

/// Why a due date could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DueParseError {
    #[error("no due date given")]
    Empty,
    #[error("unrecognised due date '{0}' (try 'in 2h', 'tomorrow 09:00' or 'YYYY-MM-DD HH:MM')")]
    Unrecognised(String),
    #[error("due date must be in the future")]
    InPast,
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Parse due date input relative to `now`.
///
/// Supports:
/// - "in 30m", "in 2h", "in 3d", "in 1w"
/// - "HH:MM" (today, or tomorrow once that time has passed)
/// - "today HH:MM", "tomorrow", "tomorrow HH:MM"
/// - "friday", "fri 17:00", "next friday", "this friday 09:00"
/// - "eod" / "end of day", "eow" / "end of week" (23:59)
/// - "YYYY-MM-DD", "YYYY-MM-DD HH:MM", "YYYY-MM-DDTHH:MM[:SS]"
pub fn parse_due_input<Tz: TimeZone>(
    s: &str,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>, DueParseError> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(DueParseError::Empty);
    }

    let due = match parse_offset(&s) {
        Some(offset) => now
            .clone()
            .checked_add_signed(offset)
            .ok_or_else(|| DueParseError::Unrecognised(s.clone()))?,
        None => {
            let naive =
                parse_wall_clock(&s, now).ok_or_else(|| DueParseError::Unrecognised(s.clone()))?;
            now.timezone()
                .from_local_datetime(&naive)
                .earliest()
                .ok_or(DueParseError::NonexistentLocalTime(naive))?
        }
    };

    if &due <= now {
        return Err(DueParseError::InPast);
    }
    Ok(due)
}

/// "in N<unit>" patterns.
fn parse_offset(s: &str) -> Option<Duration> {
    let rest = s.strip_prefix("in ")?.trim();
    let split = rest.find(|c: char| !c.is_ascii_digit())?;
    let (amount, unit) = rest.split_at(split);
    let amount: i64 = amount.parse().ok()?;
    match unit.trim() {
        "m" | "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(amount),
        "h" | "hr" | "hrs" | "hour" | "hours" => Duration::try_hours(amount),
        "d" | "day" | "days" => Duration::try_days(amount),
        "w" | "week" | "weeks" => Duration::try_weeks(amount),
        _ => None,
    }
}

/// Calendar and clock patterns, resolved to a local wall-clock time.
fn parse_wall_clock<Tz: TimeZone>(s: &str, now: &DateTime<Tz>) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dt%H:%M",
        "%Y-%m-%dt%H:%M:%S",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    let today = now.date_naive();
    let now_time = now.time();

    // Bare time rolls over to tomorrow once it has passed.
    if let Some(time) = parse_time(s) {
        let date = if time <= now_time {
            today.succ_opt()?
        } else {
            today
        };
        return Some(date.and_time(time));
    }

    let (day, time) = match s.rsplit_once(' ') {
        Some((head, tail)) => match parse_time(tail) {
            Some(time) => (head.trim(), Some(time)),
            None => (s, None),
        },
        None => (s, None),
    };
    let (date, default_time) = parse_day(day, today)?;
    Some(date.and_time(time.or(default_time).unwrap_or(now_time)))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Resolve a day expression. The second value is the time of day the
/// keyword implies, if any.
fn parse_day(s: &str, today: NaiveDate) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0);
    match s {
        "today" => return Some((today, None)),
        "tomorrow" => return Some((today.succ_opt()?, None)),
        "eod" | "end of day" => return Some((today, end_of_day)),
        "eow" | "end of week" => {
            // ISO week: Sunday is the last day.
            let to_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
            return Some((today + Duration::days(to_sunday), end_of_day));
        }
        _ => {}
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current_day = i64::from(today.weekday().num_days_from_monday());
    for (day_name, target_day) in weekdays {
        let days_ahead = (target_day + 7 - current_day) % 7;
        if s == day_name || s == format!("this {day_name}") {
            return Some((today + Duration::days(days_ahead), None));
        }
        if s == format!("next {day_name}") {
            // Next week's occurrence
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Some((today + Duration::days(days_to_add), None));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| (date, None))
}

/// A task given on the command line as `NAME@DUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub name: String,
    pub due: DateTime<Local>,
}

/// Why a `NAME@DUE` argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskSpecError {
    #[error("expected NAME@DUE, e.g. 'Buy milk@tomorrow 18:00'")]
    MissingSeparator,
    #[error("task name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Due(#[from] DueParseError),
}

impl TaskSpec {
    /// Parse `NAME@DUE`, splitting on the last '@' so names may contain one.
    pub fn parse_at(s: &str, now: &DateTime<Local>) -> Result<Self, TaskSpecError> {
        let (name, due) = s.rsplit_once('@').ok_or(TaskSpecError::MissingSeparator)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(TaskSpecError::EmptyName);
        }
        Ok(TaskSpec {
            name: name.to_string(),
            due: parse_due_input(due, now)?,
        })
    }
}

impl FromStr for TaskSpec {
    type Err = TaskSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskSpec::parse_at(s, &Local::now())
    }
}
