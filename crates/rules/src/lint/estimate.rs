//! Next-evaluation estimator.

use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::scheduler::calendar::start_of_day;
use crate::scheduler::cron::next_tick;
use crate::scheduler::gates::day_gates_hold;
use crate::scheduler::parse_schedule;
use crate::schema::When;
use crate::snapshot::Timestamp;

/// Days scanned ahead when looking for a day-gated match.
const SCAN_DAYS: i64 = 365;

/// Approximate the next instant any of `whens` becomes eligible.
///
/// Schedules give exact ticks; the soonest wins. Day-gated entries resolve to
/// the first matching day's midnight plus one poll interval, never earlier
/// than one poll interval from `now`.
pub fn next_eligible(whens: &[When], now: &Timestamp, poll: StdDuration) -> Option<Timestamp> {
    if whens.is_empty() {
        return None;
    }
    let poll = Duration::from_std(poll).ok()?;

    let soonest_tick = whens
        .iter()
        .filter(|w| w.has_schedule())
        .filter_map(|w| parse_schedule(&w.schedule).ok())
        .filter_map(|schedule| next_tick(&schedule, now))
        .min();
    if soonest_tick.is_some() {
        return soonest_tick;
    }

    let after_poll = now.checked_add_signed(poll)?;
    if !whens.iter().any(When::has_day_gates) {
        return Some(after_poll);
    }

    (0..=SCAN_DAYS).find_map(|offset| {
        let day = *now + Duration::days(offset);
        let open = whens
            .iter()
            .any(|w| day_gates_hold(w, &day).unwrap_or(false));
        if !open {
            return None;
        }
        let approx = start_of_day(&day).checked_add_signed(poll)?;
        Some(if approx < after_poll { after_poll } else { approx })
    })
}
