//! Day-of-month, day range, weekday and nth-weekday gates.

use chrono::{Datelike, Weekday};

use crate::schema::When;
use crate::snapshot::Timestamp;

use super::calendar::{days_in_month, parse_weekday};

/// `nth_weekday` values that cannot be interpreted. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NthWeekdayError {
    #[error("invalid nth_weekday {0:?}: expected \"<n|last> <weekday>\"")]
    InvalidNthWeekdaySyntax(String),
}

/// Which occurrence of a weekday within its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// 1-indexed.
    Nth(u32),
    Last,
}

/// Parsed `nth_weekday` gate, e.g. `"1 Monday"` or `"last fri"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthWeekday {
    pub occurrence: Occurrence,
    pub weekday: Weekday,
}

impl NthWeekday {
    pub fn parse(expr: &str) -> Result<Self, NthWeekdayError> {
        let invalid = || NthWeekdayError::InvalidNthWeekdaySyntax(expr.to_string());

        let parts: Vec<&str> = expr.split_whitespace().collect();
        let [nth, day] = parts.as_slice() else {
            return Err(invalid());
        };
        let occurrence = if nth.eq_ignore_ascii_case("last") {
            Occurrence::Last
        } else {
            match nth.parse::<u32>() {
                Ok(n) if n >= 1 => Occurrence::Nth(n),
                _ => return Err(invalid()),
            }
        };
        let weekday = parse_weekday(day).ok_or_else(invalid)?;
        Ok(Self { occurrence, weekday })
    }

    /// Whether `t` falls on this occurrence within its month.
    pub fn matches(&self, t: &Timestamp) -> bool {
        if t.weekday() != self.weekday {
            return false;
        }
        let day = t.day();
        match self.occurrence {
            Occurrence::Nth(n) => (day - 1) / 7 + 1 == n,
            Occurrence::Last => day + 7 > days_in_month(t),
        }
    }
}

/// Any entry matches; `0` never does, negatives count back from month end.
pub fn matches_day_of_month(days: &[i32], t: &Timestamp) -> bool {
    let today = t.day() as i32;
    let last = days_in_month(t) as i32;
    days.iter().any(|&d| match d {
        d if d > 0 => d == today,
        d if d < 0 => last + d + 1 == today,
        _ => false,
    })
}

/// Parse `"start-end"` with trimmed integer bounds.
pub fn parse_range(range: &str) -> Option<(i32, i32)> {
    let (start, end) = range.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

/// Any parseable range contains today; `start > end` wraps past month end.
pub fn matches_day_of_month_range(ranges: &[String], t: &Timestamp) -> bool {
    let today = t.day() as i32;
    ranges.iter().filter_map(|r| parse_range(r)).any(|(start, end)| {
        if start <= end {
            (start..=end).contains(&today)
        } else {
            today >= start || today <= end
        }
    })
}

pub fn matches_days_of_week(names: &[String], t: &Timestamp) -> bool {
    let today = t.weekday();
    names
        .iter()
        .any(|name| parse_weekday(name) == Some(today))
}

/// AND of every configured day gate. Unconfigured gates hold.
pub fn day_gates_hold(when: &When, t: &Timestamp) -> Result<bool, NthWeekdayError> {
    if !when.day_of_month.is_empty() && !matches_day_of_month(&when.day_of_month, t) {
        return Ok(false);
    }
    if !when.day_of_month_range.is_empty()
        && !matches_day_of_month_range(&when.day_of_month_range, t)
    {
        return Ok(false);
    }
    if !when.days_of_week.is_empty() && !matches_days_of_week(&when.days_of_week, t) {
        return Ok(false);
    }
    if !when.nth_weekday.trim().is_empty() {
        return Ok(NthWeekday::parse(&when.nth_weekday)?.matches(t));
    }
    Ok(true)
}
