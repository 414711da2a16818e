//! Verbose evaluation traces.

use tracing::debug;

/// Receives step-by-step evaluation messages (captures, gate skips, condition
/// results). Injected per evaluator; nothing is traced without one.
pub trait DiagnosticSink: Send + Sync {
    fn trace(&self, rule: &str, message: &str);
}

/// Forwards traces to `tracing::debug!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn trace(&self, rule: &str, message: &str) {
        debug!(target: "ynab_rules::trace", rule, "{message}");
    }
}
