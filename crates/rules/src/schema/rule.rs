//! Rule, observe, and when records.

use serde::Deserialize;

use super::one_or_many::one_or_many;
use super::CaptureOn;

/// Top-level rule definition parsed from YAML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Rule {
    /// Display name; used as the notification subject.
    #[serde(default)]
    pub name: String,
    /// Value captures, applied in order before any condition.
    #[serde(default, deserialize_with = "one_or_many")]
    pub observe: Vec<Observe>,
    /// Gate + condition pairs; each firing entry yields one trigger.
    #[serde(default, deserialize_with = "one_or_many")]
    pub when: Vec<When>,
    /// Notification channel identifiers, interpreted by the dispatcher.
    #[serde(default)]
    pub notify: Vec<String>,
    /// Free-form payload carried through untouched.
    #[serde(default)]
    pub meta: serde_yaml::Value,
}

/// Captures an expression's value under a named variable.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Observe {
    pub capture_on: CaptureOn,
    pub variable: String,
    /// Expression resolved to milli-units at capture time.
    pub value: String,
}

/// Evaluation condition with optional time gates.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct When {
    /// `left OP right` comparison.
    pub condition: String,
    /// Days of the month; negative values count back from the last day.
    pub day_of_month: Vec<i32>,
    /// `"start-end"` ranges; `start > end` wraps past the month boundary.
    pub day_of_month_range: Vec<String>,
    pub days_of_week: Vec<String>,
    /// `"<n|last> <weekday>"`, e.g. `"1 Monday"`.
    pub nth_weekday: String,
    /// Five-field cron expression. Overrides every day gate when set.
    pub schedule: String,
}

impl When {
    /// Whether any day/week gate is configured (schedule excluded).
    pub fn has_day_gates(&self) -> bool {
        !self.day_of_month.is_empty()
            || !self.day_of_month_range.is_empty()
            || !self.days_of_week.is_empty()
            || !self.nth_weekday.trim().is_empty()
    }

    pub fn has_schedule(&self) -> bool {
        !self.schedule.trim().is_empty()
    }
}
