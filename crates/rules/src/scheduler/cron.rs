//! Cron normalization and tick helpers.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::Duration;
use cron::Schedule;

use crate::snapshot::Timestamp;

use super::calendar::same_minute;

/// How far back the eligibility check looks for the current tick.
const TICK_LOOKBACK_MINUTES: i64 = 2;

/// Schedule expressions that cannot be interpreted. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid schedule {expr:?}: {reason}")]
    InvalidScheduleSyntax { expr: String, reason: String },
}

impl ScheduleError {
    fn new(expr: &str, reason: impl ToString) -> Self {
        Self::InvalidScheduleSyntax {
            expr: expr.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The underlying parser message.
    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidScheduleSyntax { reason, .. } => reason,
        }
    }
}

/// A parsed rule schedule.
///
/// Holds two crate schedules when both day-of-month and day-of-week are
/// restricted: standard cron fires when either field matches, the `cron`
/// crate only when both do.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    alternatives: Vec<Schedule>,
}

impl CronSchedule {
    /// The first tick strictly after `from` across all alternatives.
    fn first_after(&self, from: &Timestamp) -> Option<Timestamp> {
        self.alternatives
            .iter()
            .filter_map(|schedule| schedule.after(from).next())
            .min()
    }
}

/// Normalize a 5-field cron expression to the 6-field form of the `cron` crate.
///
/// Prepends `0` for seconds and renumbers the day-of-week field: rule documents
/// use `0-7` with Sunday as `0` or `7`, the crate uses `1-7` with Sunday as `1`.
/// A restricted day-of-month together with a restricted day-of-week yields two
/// expressions, one per day field. `@` shorthands (`@daily`, `@hourly`, ...)
/// pass through unchanged.
pub(crate) fn normalize_cron(cron_5field: &str) -> Result<Vec<String>, ScheduleError> {
    let trimmed = cron_5field.trim();
    if trimmed.starts_with('@') {
        return Ok(vec![trimmed.to_string()]);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let [minute, hour, dom, month, dow] = fields.as_slice() else {
        return Err(ScheduleError::new(
            trimmed,
            format!("expected exactly 5 fields, found {}", fields.len()),
        ));
    };
    let shifted = shift_day_of_week(dow).map_err(|reason| ScheduleError::new(trimmed, reason))?;
    if is_restricted(dom) && is_restricted(dow) {
        return Ok(vec![
            format!("0 {minute} {hour} {dom} {month} *"),
            format!("0 {minute} {hour} * {month} {shifted}"),
        ]);
    }
    Ok(vec![format!("0 {minute} {hour} {dom} {month} {shifted}")])
}

/// Parse a rule `schedule` value.
pub fn parse_schedule(expr: &str) -> Result<CronSchedule, ScheduleError> {
    let alternatives = normalize_cron(expr)?
        .iter()
        .map(|normalized| Schedule::from_str(normalized))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ScheduleError::new(expr.trim(), e))?;
    Ok(CronSchedule { alternatives })
}

/// Whether a schedule tick falls in the calendar minute of `now`.
///
/// Takes the first tick strictly after `now - 2 minutes`.
pub(crate) fn is_tick_now(schedule: &CronSchedule, now: &Timestamp) -> bool {
    let from = *now - Duration::minutes(TICK_LOOKBACK_MINUTES);
    schedule
        .first_after(&from)
        .is_some_and(|tick| same_minute(&tick, now))
}

/// The first tick strictly after `now`.
pub(crate) fn next_tick(schedule: &CronSchedule, now: &Timestamp) -> Option<Timestamp> {
    schedule.first_after(now)
}

/// A day field is unrestricted when any of its items starts with `*` or `?`.
fn is_restricted(field: &str) -> bool {
    !field
        .split(',')
        .any(|item| item.starts_with('*') || item.starts_with('?'))
}

/// Rewrite numeric day-of-week items as explicit `1-7` lists.
fn shift_day_of_week(field: &str) -> Result<String, String> {
    let items = field
        .split(',')
        .map(shift_day_of_week_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items.join(","))
}

fn shift_day_of_week_item(item: &str) -> Result<String, String> {
    // Names, `*` and `?` mean the same thing in both numberings.
    if item == "*" || item == "?" || item.chars().any(|c| c.is_ascii_alphabetic()) {
        return Ok(item.to_string());
    }

    let (base, step) = match item.split_once('/') {
        Some((base, step)) => {
            let step: u32 = step
                .parse()
                .map_err(|_| format!("invalid day-of-week step {step:?}"))?;
            if step == 0 {
                return Err("day-of-week step must be positive".to_string());
            }
            (base, step)
        }
        None => (item, 1),
    };

    let (start, end) = if base == "*" {
        (0, 6)
    } else if let Some((start, end)) = base.split_once('-') {
        (parse_weekday_number(start)?, parse_weekday_number(end)?)
    } else {
        let day = parse_weekday_number(base)?;
        // `n/step` runs to Saturday; a bare `n` is the single day.
        if item.contains('/') {
            (day % 7, 6)
        } else {
            (day, day)
        }
    };
    if start > end {
        return Err(format!("day-of-week range {base:?} is reversed"));
    }

    let days: BTreeSet<u32> = (start..=end)
        .step_by(step as usize)
        .map(|day| day % 7 + 1)
        .collect();
    Ok(days
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(","))
}

fn parse_weekday_number(text: &str) -> Result<u32, String> {
    match text.parse::<u32>() {
        Ok(day) if day <= 7 => Ok(day),
        _ => Err(format!("day-of-week value {text:?} is out of range 0..7")),
    }
}
