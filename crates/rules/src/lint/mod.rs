//! Rule lint checks and next-evaluation estimates for diagnostic tooling.

mod checks;
mod estimate;


use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::loader::{LoadError, RuleLoader};
use crate::schema::Rule;
use crate::snapshot::Timestamp;

pub use self::estimate::next_eligible;

/// Issues and the estimated next evaluation for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintResult {
    pub name: String,
    /// Empty when the rule is clean.
    pub issues: Vec<String>,
    /// `None` when no evaluation is expected within a year.
    pub next_eval: Option<Timestamp>,
}

/// Lint `rules` in order. Duplicate names are flagged on every repeat.
pub fn lint_rules(rules: &[Rule], now: &Timestamp, poll: Duration) -> Vec<LintResult> {
    let mut seen = HashSet::new();

    rules
        .iter()
        .map(|rule| {
            let mut issues = Vec::new();
            if rule.name.is_empty() {
                issues.push("rule has no name".to_string());
            } else if !seen.insert(rule.name.as_str()) {
                issues.push("duplicate rule name".to_string());
            }

            let known_vars: HashSet<&str> = rule
                .observe
                .iter()
                .map(|o| o.variable.as_str())
                .filter(|v| !v.is_empty())
                .collect();
            issues.extend(checks::observe_issues(&rule.observe));
            issues.extend(checks::when_issues(&rule.when, &known_vars));

            LintResult {
                name: rule.name.clone(),
                issues,
                next_eval: next_eligible(&rule.when, now, poll),
            }
        })
        .collect()
}

/// Load every rule document in `dir`, then lint.
pub fn lint_dir(
    dir: impl AsRef<Path>,
    now: &Timestamp,
    poll: Duration,
) -> Result<Vec<LintResult>, LoadError> {
    let rules = RuleLoader::new(dir.as_ref()).load_all()?;
    Ok(lint_rules(&rules, now, poll))
}
