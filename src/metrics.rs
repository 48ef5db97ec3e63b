//! Countdown and urgency scoring.
//!
//! Everything here is a pure function of a due instant and the current
//! instant. Nothing reads the clock, so the same inputs always give the same
//! outputs and the functions can be called from anywhere.
//!
//! Both the progress fraction and the urgency threshold are measured against
//! the span from local midnight of the current day to the due instant, not
//! against the time the task was created.

use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use serde::Serialize;

use crate::fields::Urgency;

/// Text shown in place of a countdown once a task is due.
pub const OVERDUE_TEXT: &str = "Time is up";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// The derived fields of a task, computed together at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub time_left: String,
    pub progress: f64,
    pub urgency: Urgency,
}

impl Metrics {
    /// Compute all derived fields for `due` as seen at `now`.
    pub fn compute<Tz: TimeZone>(due: &DateTime<Tz>, now: &DateTime<Tz>) -> Self {
        Metrics {
            time_left: remaining_time_text(due, now),
            progress: progress_fraction(due, now),
            urgency: urgency_level(due, now),
        }
    }
}

/// Midnight at the start of `now`'s calendar day in `now`'s zone.
///
/// Where a DST transition skips midnight, the first local minute of the day
/// that exists is used instead.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start;
    }
    (1..=180)
        .find_map(|m| {
            tz.from_local_datetime(&(midnight + Duration::minutes(m)))
                .earliest()
        })
        .unwrap_or_else(|| now.clone())
}

/// Remaining time as a fraction of the span from today's midnight to `due`.
///
/// Never negative. Returns 0 when that span is empty (due exactly at
/// midnight).
pub fn progress_fraction<Tz: TimeZone>(due: &DateTime<Tz>, now: &DateTime<Tz>) -> f64 {
    let total = millis_between(due, now);
    let span = millis_between(due, &start_of_day(now));
    if span == 0 {
        return 0.0;
    }
    (total as f64 / span as f64).max(0.0)
}

/// Countdown text in the form `"{d}d {h}h {m}m {s}s"`, or [`OVERDUE_TEXT`].
///
/// Components are floored, never rounded, and zero components are kept.
pub fn remaining_time_text<Tz: TimeZone>(due: &DateTime<Tz>, now: &DateTime<Tz>) -> String {
    let total = millis_between(due, now);
    if total <= 0 {
        return OVERDUE_TEXT.to_string();
    }
    let (days, hours, minutes, seconds) = decompose(total);
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

/// Classify how close `due` is.
///
/// `Approaching` once the time left is at most half of the span from today's
/// midnight to `due`, boundary included.
pub fn urgency_level<Tz: TimeZone>(due: &DateTime<Tz>, now: &DateTime<Tz>) -> Urgency {
    let total = millis_between(due, now);
    if total <= 0 {
        return Urgency::Overdue;
    }
    let span = millis_between(due, &start_of_day(now));
    // total <= span / 2, without losing the odd millisecond
    if total.saturating_mul(2) <= span {
        Urgency::Approaching
    } else {
        Urgency::Ample
    }
}

fn millis_between<Tz: TimeZone>(later: &DateTime<Tz>, earlier: &DateTime<Tz>) -> i64 {
    later
        .clone()
        .signed_duration_since(earlier.clone())
        .num_milliseconds()
}

fn decompose(millis: i64) -> (i64, i64, i64, i64) {
    let days = millis / MS_PER_DAY;
    let hours = (millis % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (millis % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (millis % MS_PER_MINUTE) / MS_PER_SECOND;
    (days, hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, h, m, s).unwrap()
    }

    /// Inverse of the countdown format, in whole seconds.
    fn text_seconds(text: &str) -> i64 {
        let parts: Vec<i64> = text
            .split(' ')
            .map(|p| p[..p.len() - 1].parse().unwrap())
            .collect();
        parts[0] * 86_400 + parts[1] * 3_600 + parts[2] * 60 + parts[3]
    }

    #[test]
    fn test_start_of_day() {
        assert_eq!(start_of_day(&at(15, 42, 7)), at(0, 0, 0));

        let plus_nine = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = plus_nine.with_ymd_and_hms(2026, 10, 14, 1, 30, 0).unwrap();
        let expected = plus_nine.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap();
        assert_eq!(start_of_day(&now), expected);
    }

    #[test]
    fn test_progress_fraction_same_day() {
        // 6h left of an 18h span from midnight
        let p = progress_fraction(&at(18, 0, 0), &at(12, 0, 0));
        assert!((p - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_progress_fraction_is_one_at_midnight() {
        let due = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        assert_eq!(progress_fraction(&due, &at(0, 0, 0)), 1.0);
    }

    #[test]
    fn test_progress_fraction_zero_span() {
        assert_eq!(progress_fraction(&at(0, 0, 0), &at(0, 0, 0)), 0.0);
    }

    #[test]
    fn test_progress_fraction_due_before_midnight() {
        // Both deltas are negative: 11h past due over a span of -1h.
        let due = Utc.with_ymd_and_hms(2026, 10, 13, 23, 0, 0).unwrap();
        assert_eq!(progress_fraction(&due, &at(10, 0, 0)), 11.0);
    }

    #[test]
    fn test_progress_fraction_overdue_today_clamps() {
        assert_eq!(progress_fraction(&at(9, 0, 0), &at(10, 0, 0)), 0.0);
    }

    #[test]
    fn test_remaining_time_text_floors_components() {
        let now = at(10, 0, 0);
        let due = now + Duration::days(1)
            + Duration::hours(2)
            + Duration::minutes(3)
            + Duration::seconds(4)
            + Duration::milliseconds(999);
        assert_eq!(remaining_time_text(&due, &now), "1d 2h 3m 4s");
    }

    #[test]
    fn test_remaining_time_text_keeps_zero_units() {
        let now = at(10, 0, 0);
        assert_eq!(remaining_time_text(&(now + Duration::seconds(1)), &now), "0d 0h 0m 1s");
        assert_eq!(remaining_time_text(&(now + Duration::days(2)), &now), "2d 0h 0m 0s");
        assert_eq!(
            remaining_time_text(&(now + Duration::milliseconds(400)), &now),
            "0d 0h 0m 0s"
        );
    }

    #[test]
    fn test_overdue_sentinel() {
        let now = at(10, 0, 0);
        assert_eq!(remaining_time_text(&now, &now), OVERDUE_TEXT);
        assert_eq!(remaining_time_text(&at(9, 0, 0), &now), "Time is up");
        assert_eq!(urgency_level(&now, &now), Urgency::Overdue);
    }

    #[test]
    fn test_urgency_half_span_boundary() {
        let midnight = at(0, 0, 0);
        let due = midnight + Duration::milliseconds(1000);

        assert_eq!(urgency_level(&due, &midnight), Urgency::Ample);
        // half of the 1000ms span is left
        let half = midnight + Duration::milliseconds(500);
        assert_eq!(urgency_level(&due, &half), Urgency::Approaching);
        let just_before = midnight + Duration::milliseconds(499);
        assert_eq!(urgency_level(&due, &just_before), Urgency::Ample);
    }

    #[test]
    fn test_urgency_odd_span_boundary() {
        // span 1001ms: 500ms left is within half, 501ms is not
        let midnight = at(0, 0, 0);
        let due = midnight + Duration::milliseconds(1001);
        assert_eq!(
            urgency_level(&due, &(midnight + Duration::milliseconds(501))),
            Urgency::Approaching
        );
        assert_eq!(
            urgency_level(&due, &(midnight + Duration::milliseconds(500))),
            Urgency::Ample
        );
    }

    #[test]
    fn test_urgency_same_day_afternoon() {
        // Due 20:00: span 20h, half 10h. At 09:00 11h remain, at 10:00 10h.
        assert_eq!(urgency_level(&at(20, 0, 0), &at(9, 0, 0)), Urgency::Ample);
        assert_eq!(urgency_level(&at(20, 0, 0), &at(10, 0, 0)), Urgency::Approaching);
    }

    #[test]
    fn test_metrics_compute_bundles_fields() {
        let now = at(12, 0, 0);
        let due = at(18, 0, 0);
        let m = Metrics::compute(&due, &now);
        assert_eq!(m.time_left, "0d 6h 0m 0s");
        assert_eq!(m.urgency, Urgency::Approaching);
        assert!((m.progress - progress_fraction(&due, &now)).abs() < f64::EPSILON);
    }

    fn instant(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_790_000_000_000 + ms).unwrap()
    }

    proptest! {
        #[test]
        fn prop_progress_never_negative(now_ms in 0i64..400_000_000_000, ahead in 1i64..100_000_000_000) {
            let now = instant(now_ms);
            let due = instant(now_ms + ahead);
            prop_assert!(progress_fraction(&due, &now) >= 0.0);
        }

        #[test]
        fn prop_due_or_past_is_overdue(now_ms in 0i64..400_000_000_000, behind in 0i64..100_000_000_000) {
            let now = instant(now_ms);
            let due = instant(now_ms - behind);
            prop_assert_eq!(urgency_level(&due, &now), Urgency::Overdue);
            prop_assert_eq!(remaining_time_text(&due, &now), OVERDUE_TEXT);
        }

        #[test]
        fn prop_countdown_non_increasing(
            due_ms in 0i64..400_000_000_000,
            first in 1i64..10_000_000_000,
            step in 0i64..10_000_000_000,
        ) {
            let due = instant(due_ms);
            let earlier = instant(due_ms - first - step);
            let later = instant(due_ms - first);
            let before = text_seconds(&remaining_time_text(&due, &earlier));
            let after = text_seconds(&remaining_time_text(&due, &later));
            prop_assert!(after <= before);
        }
    }
}
