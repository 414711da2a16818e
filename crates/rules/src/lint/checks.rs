//! Per-rule validation checks. Each returns human-readable issue strings.

use std::collections::HashSet;

use crate::condition::Condition;
use crate::scheduler::calendar::parse_weekday;
use crate::scheduler::gates::{parse_range, NthWeekday};
use crate::scheduler::parse_schedule;
use crate::schema::{CaptureOn, Observe, When};

pub(super) fn observe_issues(observes: &[Observe]) -> Vec<String> {
    let mut issues = Vec::new();
    for observe in observes {
        if observe.variable.is_empty() {
            issues.push("observe variable is empty".to_string());
        }
        if observe.value.is_empty() {
            issues.push("observe value is empty".to_string());
        }
        match &observe.capture_on {
            CaptureOn::Always => {}
            CaptureOn::DayOfMonth(day) if (1..=31).contains(day) => {}
            CaptureOn::DayOfMonth(day) => {
                issues.push(format!("observe capture_on day {day} is out of range 1..31"));
            }
            CaptureOn::Unrecognized(raw) => {
                issues.push(format!("observe capture_on value {raw:?} is invalid"));
            }
        }
    }
    issues
}

pub(super) fn when_issues(whens: &[When], known_vars: &HashSet<&str>) -> Vec<String> {
    let mut issues = Vec::new();
    if whens.is_empty() {
        issues.push("no when clause defined; rule will never run".to_string());
    }

    for when in whens {
        if when.condition.is_empty() {
            issues.push("condition is empty; rule will never fire".to_string());
        } else if Condition::parse(&when.condition).is_err() {
            issues.push(format!(
                "condition {:?} is not a single comparison",
                when.condition
            ));
        }

        for &day in &when.day_of_month {
            if day == 0 || !(-31..=31).contains(&day) {
                issues.push(format!(
                    "day_of_month value {day} is out of range -31..-1 or 1..31"
                ));
            }
        }

        for range in &when.day_of_month_range {
            match parse_range(range) {
                None => issues.push(format!("day_of_month_range value {range:?} is invalid")),
                Some((start, end)) if !(1..=31).contains(&start) || !(1..=31).contains(&end) => {
                    issues.push(format!(
                        "day_of_month_range {range:?} values must be within 1..31"
                    ));
                }
                Some(_) => {}
            }
        }

        for day in &when.days_of_week {
            if parse_weekday(day).is_none() {
                issues.push(format!("days_of_week value {day:?} is invalid"));
            }
        }

        if !when.nth_weekday.trim().is_empty() && NthWeekday::parse(&when.nth_weekday).is_err() {
            issues.push(format!("nth_weekday value {:?} is invalid", when.nth_weekday));
        }

        if when.has_schedule() {
            if let Err(err) = parse_schedule(&when.schedule) {
                issues.push(format!("schedule invalid cron: {}", err.reason()));
            }
            if when.has_day_gates() {
                issues.push("schedule present; day/week gates will be ignored".to_string());
            }
        }

        for name in var_refs(&when.condition) {
            if !known_vars.contains(name) {
                issues.push(format!("condition references unknown variable {name:?}"));
            }
        }
    }
    issues
}

/// Names referenced as `var.<name>`, in order of appearance.
pub(super) fn var_refs(condition: &str) -> Vec<&str> {
    condition
        .match_indices("var.")
        .filter_map(|(idx, prefix)| {
            let rest = &condition[idx + prefix.len()..];
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            (len > 0).then(|| &rest[..len])
        })
        .collect()
}
