//! `capture_on` policy for observations.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// When an [`Observe`](super::Observe) entry captures its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaptureOn {
    /// Every evaluation cycle (`""`, `"always"`, or absent).
    #[default]
    Always,
    /// Once on the given calendar day of the month.
    DayOfMonth(i32),
    /// Anything else. Never captures; reported by lint.
    Unrecognized(String),
}

impl CaptureOn {
    /// Interpret the raw document text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("always") {
            return Self::Always;
        }
        match raw.parse::<i32>() {
            Ok(day) => Self::DayOfMonth(day),
            Err(_) => Self::Unrecognized(raw.to_string()),
        }
    }
}

impl fmt::Display for CaptureOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::DayOfMonth(day) => write!(f, "{day}"),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for CaptureOn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // YAML authors write both `capture_on: 14` and `capture_on: "14"`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Self::Always,
            Some(Raw::Int(day)) => match i32::try_from(day) {
                Ok(day) => Self::DayOfMonth(day),
                Err(_) => Self::Unrecognized(day.to_string()),
            },
            Some(Raw::Text(text)) => Self::parse(&text),
        })
    }
}
