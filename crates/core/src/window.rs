//! Time-of-day window restricting when the daemon evaluates rules.

use std::fmt;

use chrono::NaiveTime;

use crate::error::ConfigError;

/// `[start, end)` within a day. A missing bound means midnight / end of day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalWindow {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl EvalWindow {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// False when `t` is before `start` or at/after `end`.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start.is_some_and(|start| t < start) {
            return false;
        }
        if self.end.is_some_and(|end| t >= end) {
            return false;
        }
        true
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let start = self.start.unwrap_or(NaiveTime::MIN);
        match self.end {
            Some(end) if start >= end => Err(ConfigError::Invalid(
                "day_start must be before day_end".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for EvalWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            return f.write_str("none");
        }
        let start = self.start.unwrap_or(NaiveTime::MIN).format("%H:%M");
        match self.end {
            Some(end) => write!(f, "{start}-{}", end.format("%H:%M")),
            None => write!(f, "{start}-24:00"),
        }
    }
}
