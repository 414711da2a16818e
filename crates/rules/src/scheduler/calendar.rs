//! Calendar helpers evaluated in the offset carried by each instant.

use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};

use crate::snapshot::Timestamp;

/// Number of days in the month containing `t`.
pub fn days_in_month(t: &Timestamp) -> u32 {
    let (year, month) = (t.year(), t.month());
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// Case-insensitive weekday name, full or abbreviated.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let weekday = match name.trim().to_ascii_lowercase().as_str() {
        "sun" | "sunday" => Weekday::Sun,
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        _ => return None,
    };
    Some(weekday)
}

pub fn same_calendar_day(a: &Timestamp, b: &Timestamp) -> bool {
    a.date_naive() == b.date_naive()
}

pub fn same_minute(a: &Timestamp, b: &Timestamp) -> bool {
    same_calendar_day(a, b) && a.hour() == b.hour() && a.minute() == b.minute()
}

/// Midnight of the calendar day containing `t`, same offset.
pub fn start_of_day(t: &Timestamp) -> Timestamp {
    *t - Duration::seconds(i64::from(t.num_seconds_from_midnight()))
        - Duration::nanoseconds(i64::from(t.nanosecond()))
}
