//! Evaluation errors.

use crate::condition::Side;
use crate::resolver::ResolveError;
use crate::store::StoreError;

use super::Trigger;

/// A fatal error raised while evaluating one rule.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("rule {rule:?}: observation missing variable or value")]
    CaptureFieldMissing { rule: String },

    #[error("rule {rule:?}: capture of {variable:?} failed: {source}")]
    Capture {
        rule: String,
        variable: String,
        source: ResolveError,
    },

    #[error("rule {rule:?}: {source}")]
    Store { rule: String, source: StoreError },

    #[error("rule {rule:?}: unable to parse condition {condition:?}")]
    MalformedCondition { rule: String, condition: String },

    #[error("rule {rule:?}: {side} side: {source}")]
    Condition {
        rule: String,
        side: Side,
        source: ResolveError,
    },

    #[error("evaluation cancelled before rule {rule:?}")]
    Cancelled { rule: String },
}

impl EvalError {
    /// Name of the rule that raised the error.
    pub fn rule(&self) -> &str {
        match self {
            Self::CaptureFieldMissing { rule }
            | Self::Capture { rule, .. }
            | Self::Store { rule, .. }
            | Self::MalformedCondition { rule, .. }
            | Self::Condition { rule, .. }
            | Self::Cancelled { rule } => rule,
        }
    }
}

/// An aborted cycle: the error plus every trigger produced before it.
#[derive(Debug, thiserror::Error)]
#[error("{error} ({} trigger(s) before abort)", .triggers.len())]
pub struct EvaluationAborted {
    pub triggers: Vec<Trigger>,
    #[source]
    pub error: EvalError,
}
