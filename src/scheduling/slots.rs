//! Slot clock: the fixed working-day slot catalog and the conversions between
//! calendar dates, slot labels and concrete points in time.
//!
//! The catalog is static and identical every day: seven half-hour slots from
//! 8:00 AM to 2:30 PM, with the 11:00 AM and 12:00 PM entries reserved as the
//! lunch break. Nothing in here touches appointment data.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;

/// Delimiter between the start and end halves of a slot label
const RANGE_DELIMITER: &str = " - ";

/// Length of every bookable slot
pub const SLOT_MINUTES: i64 = 30;

/// One fixed catalog entry in the working day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Display label, e.g. "9:00 AM - 9:30 AM"
    pub label: &'static str,
    /// Start time of day
    pub start: NaiveTime,
    /// True for the lunch-break entries
    pub is_break: bool,
}

static SLOT_CATALOG: Lazy<Vec<Slot>> = Lazy::new(|| {
    let slot = |label: &'static str, h: u32, m: u32, is_break: bool| Slot {
        label,
        start: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
        is_break,
    };
    vec![
        slot("8:00 AM - 8:30 AM", 8, 0, false),
        slot("9:00 AM - 9:30 AM", 9, 0, false),
        slot("10:00 AM - 10:30 AM", 10, 0, false),
        slot("11:00 AM - 11:30 AM", 11, 0, true),
        slot("12:00 PM - 12:30 PM", 12, 0, true),
        slot("1:00 PM - 1:30 PM", 13, 0, false),
        slot("2:00 PM - 2:30 PM", 14, 0, false),
    ]
});

/// The ordered, fixed sequence of working-day slots
pub fn slot_catalog() -> &'static [Slot] {
    &SLOT_CATALOG
}

/// True iff `label` is one of the fixed lunch-break labels
pub fn is_break_slot(label: &str) -> bool {
    slot_catalog()
        .iter()
        .any(|s| s.is_break && match_by_start_time(s.label, label))
}

/// Start-time half of a range label ("8:00 AM" from "8:00 AM - 8:30 AM").
/// A bare start time passes through unchanged.
pub fn start_of_label(label: &str) -> &str {
    label.split(RANGE_DELIMITER).next().unwrap_or(label).trim()
}

/// Two slot labels name the same slot iff their start-time halves are equal.
///
/// Stored appointment times are persisted as a single start instant and then
/// synthesized back into a "start - start+30min" label for display, so full
/// range equality would spuriously fail; only start times are ever compared.
pub fn match_by_start_time(a: &str, b: &str) -> bool {
    start_of_label(a) == start_of_label(b)
}

/// Parse a 12-hour clock time like "8:00 AM" or "12 PM" into a time of day.
///
/// 12 AM maps to hour 0, 12 PM stays hour 12, minutes default to 0.
pub fn parse_clock_time(time_str: &str) -> Option<NaiveTime> {
    let mut parts = time_str.trim().split_whitespace();
    let hm = parts.next()?;
    let period = parts.next()?.to_ascii_uppercase();

    let mut hm_parts = hm.split(':');
    let mut hours: u32 = hm_parts.next()?.parse().ok()?;
    let minutes: u32 = match hm_parts.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };

    match period.as_str() {
        "PM" if hours < 12 => hours += 12,
        "AM" if hours == 12 => hours = 0,
        "AM" | "PM" => {}
        _ => return None,
    }

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Combine a date with a slot label's start time into a concrete point in
/// time, for comparison against "now"
pub fn parse_slot_label(date: NaiveDate, label: &str) -> Option<NaiveDateTime> {
    parse_clock_time(start_of_label(label)).map(|t| date.and_time(t))
}

/// True iff the slot's start is strictly before `now`
pub fn is_past_slot(date: NaiveDate, label: &str, now: NaiveDateTime) -> bool {
    match parse_slot_label(date, label) {
        Some(start) => start < now,
        // Unparseable labels never match a live slot; treat as past
        None => true,
    }
}

/// Format a time of day on the 12-hour clock, e.g. "8:00 AM", "1:30 PM"
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Synthesize the display label for a stored start instant:
/// "start - start+30min" on the 12-hour clock
pub fn label_for_start_time(start: NaiveTime) -> String {
    let end = start + Duration::minutes(SLOT_MINUTES);
    format!(
        "{}{}{}",
        format_clock_time(start),
        RANGE_DELIMITER,
        format_clock_time(end)
    )
}

/// Roll a pivot date back to the canonical start of its week (Sunday)
pub fn start_of_week(pivot: NaiveDate) -> NaiveDate {
    let days_from_sunday = pivot.weekday().num_days_from_sunday() as i64;
    pivot - Duration::days(days_from_sunday)
}

/// The 7 consecutive dates of the week containing `pivot`
pub fn week_days(pivot: NaiveDate) -> [NaiveDate; 7] {
    let start = start_of_week(pivot);
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Week-start one week before `week_start`
pub fn previous_week(week_start: NaiveDate) -> NaiveDate {
    week_start - Duration::days(7)
}

/// Week-start one week after `week_start`
pub fn next_week(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::days(7)
}

/// True iff the date falls on a Sunday (the business is closed)
pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}
