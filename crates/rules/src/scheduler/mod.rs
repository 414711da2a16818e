//! Schedule gate: decides whether a `when` entry is eligible at an instant.
//!
//! A non-empty `schedule` (five-field cron) takes precedence over every day
//! gate. Without one, all configured day gates must hold. Unparseable
//! schedules and nth-weekday values make the entry ineligible and are logged,
//! never raised.

pub mod calendar;
pub mod cron;
pub mod gates;

#[cfg(test)]
mod tests;

use tracing::warn;

use crate::schema::When;
use crate::snapshot::Timestamp;

pub use self::cron::{parse_schedule, CronSchedule, ScheduleError};
pub use self::gates::{NthWeekday, NthWeekdayError, Occurrence};

/// Whether `when` may be evaluated at `now`.
pub fn eligible(when: &When, now: &Timestamp) -> bool {
    if when.has_schedule() {
        return match parse_schedule(&when.schedule) {
            Ok(schedule) => self::cron::is_tick_now(&schedule, now),
            Err(err) => {
                warn!(schedule = %when.schedule, error = %err, "ignoring unparseable schedule");
                false
            }
        };
    }

    match gates::day_gates_hold(when, now) {
        Ok(hold) => hold,
        Err(err) => {
            warn!(nth_weekday = %when.nth_weekday, error = %err, "ignoring unparseable nth_weekday");
            false
        }
    }
}
