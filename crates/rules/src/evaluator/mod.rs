//! Rule evaluator.
//!
//! Walks the rule list in order. For each rule, observations are captured into
//! the store first, then every eligible `when` entry with a condition is
//! compared against the snapshot. Every matching entry yields one [`Trigger`].
//!
//! Errors abort the remaining rules; the triggers produced so far are returned
//! inside [`EvaluationAborted`].

mod error;


use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::condition::Condition;
use crate::diagnostics::DiagnosticSink;
use crate::resolver::resolve;
use crate::scheduler::{calendar::same_calendar_day, eligible};
use crate::schema::{CaptureOn, Observe, Rule};
use crate::snapshot::Snapshot;
use crate::store::{ObservationStore, ObservedValue};

pub use self::error::{EvalError, EvaluationAborted};

/// A fired (rule, when) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub rule: Rule,
    pub message: String,
}

impl Trigger {
    fn new(rule: &Rule, condition: &str) -> Self {
        Self {
            rule: rule.clone(),
            message: format!("Rule {} triggered: {}", rule.name, condition),
        }
    }
}

/// Evaluation settings for one cycle. Every collaborator is optional.
#[derive(Clone, Copy, Default)]
pub struct Evaluator<'a> {
    store: Option<&'a ObservationStore>,
    cancel: Option<&'a CancellationToken>,
    diagnostics: Option<&'a dyn DiagnosticSink>,
}

impl<'a> Evaluator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Without a store, observations are skipped and `vars` stay as given.
    pub fn with_store(mut self, store: &'a ObservationStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Checked once before each rule.
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_diagnostics(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Evaluate `rules` in order against `snapshot`.
    pub fn evaluate(
        &self,
        rules: &[Rule],
        mut snapshot: Snapshot,
    ) -> Result<Vec<Trigger>, EvaluationAborted> {
        let mut triggers = Vec::new();
        self.refresh_vars(&mut snapshot);

        for rule in rules {
            if let Err(error) = self.evaluate_rule(rule, &mut snapshot, &mut triggers) {
                debug!(rule = %rule.name, error = %error, "evaluation aborted");
                return Err(EvaluationAborted { triggers, error });
            }
        }

        debug!(rules = rules.len(), triggers = triggers.len(), "evaluation complete");
        Ok(triggers)
    }

    fn evaluate_rule(
        &self,
        rule: &Rule,
        snapshot: &mut Snapshot,
        triggers: &mut Vec<Trigger>,
    ) -> Result<(), EvalError> {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(EvalError::Cancelled {
                rule: rule.name.clone(),
            });
        }

        if let Some(store) = self.store {
            for observe in &rule.observe {
                self.capture(rule, observe, store, snapshot)?;
                snapshot.vars = store.snapshot();
            }
        }

        for when in &rule.when {
            if when.condition.is_empty() {
                continue;
            }
            if !eligible(when, &snapshot.now) {
                self.trace(rule, &format!("gate closed for condition {:?}", when.condition));
                continue;
            }

            let condition =
                Condition::parse(&when.condition).map_err(|_| EvalError::MalformedCondition {
                    rule: rule.name.clone(),
                    condition: when.condition.clone(),
                })?;
            let matched = condition
                .evaluate(snapshot)
                .map_err(|(side, source)| EvalError::Condition {
                    rule: rule.name.clone(),
                    side,
                    source,
                })?;

            if matched {
                self.trace(
                    rule,
                    &format!("condition matched for rule {}: {}", rule.name, when.condition),
                );
                triggers.push(Trigger::new(rule, &when.condition));
            } else {
                self.trace(rule, &format!("condition not met: {}", when.condition));
            }
        }
        Ok(())
    }

    fn capture(
        &self,
        rule: &Rule,
        observe: &Observe,
        store: &ObservationStore,
        snapshot: &Snapshot,
    ) -> Result<(), EvalError> {
        if observe.variable.is_empty() || observe.value.is_empty() {
            return Err(EvalError::CaptureFieldMissing {
                rule: rule.name.clone(),
            });
        }

        if !should_capture(observe, store, snapshot) {
            self.trace(rule, &format!("skipping capture of {}", observe.variable));
            return Ok(());
        }

        let value = resolve(&observe.value, snapshot).map_err(|source| EvalError::Capture {
            rule: rule.name.clone(),
            variable: observe.variable.clone(),
            source,
        })?;
        store
            .set(
                &observe.variable,
                ObservedValue {
                    value,
                    recorded_at: snapshot.now,
                },
            )
            .map_err(|source| EvalError::Store {
                rule: rule.name.clone(),
                source,
            })?;

        self.trace(rule, &format!("captured {} = {}", observe.variable, value));
        Ok(())
    }

    fn refresh_vars(&self, snapshot: &mut Snapshot) {
        if let Some(store) = self.store {
            snapshot.vars = store.snapshot();
        }
    }

    fn trace(&self, rule: &Rule, message: &str) {
        if let Some(sink) = self.diagnostics {
            sink.trace(&rule.name, message);
        }
    }
}

/// `DayOfMonth` captures at most once per calendar day.
fn should_capture(observe: &Observe, store: &ObservationStore, snapshot: &Snapshot) -> bool {
    use chrono::Datelike;

    match &observe.capture_on {
        CaptureOn::Always => true,
        CaptureOn::DayOfMonth(day) => {
            *day == snapshot.now.day() as i32
                && !store
                    .get(&observe.variable)
                    .is_some_and(|existing| same_calendar_day(&existing.recorded_at, &snapshot.now))
        }
        CaptureOn::Unrecognized(_) => false,
    }
}

/// Evaluate with an optional store and no cancellation or diagnostics.
pub fn evaluate(
    rules: &[Rule],
    store: Option<&ObservationStore>,
    snapshot: Snapshot,
) -> Result<Vec<Trigger>, EvaluationAborted> {
    let evaluator = match store {
        Some(store) => Evaluator::new().with_store(store),
        None => Evaluator::new(),
    };
    evaluator.evaluate(rules, snapshot)
}
