//! Per-cycle evaluation context.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

/// Instant type used across the engine. Calendar math happens in the
/// carried offset.
pub type Timestamp = DateTime<FixedOffset>;

/// Data visible to expressions during one evaluation cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Account name → current balance in milli-units.
    pub accounts: HashMap<String, i64>,
    /// Variable name → last observed value in milli-units.
    pub vars: HashMap<String, i64>,
    /// Evaluation instant.
    pub now: Timestamp,
}

impl Snapshot {
    /// Build a snapshot with no observed variables.
    pub fn new(accounts: HashMap<String, i64>, now: Timestamp) -> Self {
        Self {
            accounts,
            vars: HashMap::new(),
            now,
        }
    }

    /// Replace the variable mapping.
    pub fn with_vars(mut self, vars: HashMap<String, i64>) -> Self {
        self.vars = vars;
        self
    }
}
