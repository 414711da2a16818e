//! Balance alert rule engine.
//!
//! This crate provides:
//! - YAML rule documents with one-or-many `observe` / `when` decoding
//! - Directory loader returning the rule set for one evaluation cycle
//! - Value resolver for the `account.balance(..)` / `var.x` / literal grammar
//! - Schedule gate (cron precedence, day-of-month, ranges, weekdays, nth weekday)
//! - JSON-file observation store shared across cycles
//! - Evaluator producing triggers, with cooperative cancellation
//! - Next-evaluation estimator and lint checks for diagnostics

pub mod condition;
pub mod diagnostics;
pub mod evaluator;
pub mod lint;
pub mod loader;
pub mod resolver;
pub mod scheduler;
pub mod schema;
pub mod snapshot;
pub mod store;

pub use diagnostics::{DiagnosticSink, TracingSink};
pub use evaluator::{evaluate, EvalError, EvaluationAborted, Evaluator, Trigger};
pub use lint::{lint_dir, lint_rules, next_eligible, LintResult};
pub use loader::{LoadError, RuleLoader};
pub use resolver::{resolve, ResolveError};
pub use scheduler::eligible;
pub use schema::{CaptureOn, Observe, Rule, When};
pub use snapshot::{Snapshot, Timestamp};
pub use store::{ObservationStore, ObservedValue, StoreError};
