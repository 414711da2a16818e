//! Expression resolver producing milli-unit values.
//!
//! Grammar, tried in order after trimming:
//!
//! 1. `<factor> * <expr>` when the text holds exactly one `*` and the left
//!    side is a numeric literal. Other shapes fall through and usually end
//!    as [`ResolveError::UnsupportedExpression`].
//! 2. `account.balance("Name")`
//! 3. `account.due("Name")`, an alias of the balance lookup
//! 4. `var.<name>`
//! 5. A decimal literal in whole currency units, converted to milli-units

use crate::snapshot::Snapshot;

/// Milli-units per whole currency unit.
pub const MILLIUNITS_PER_UNIT: f64 = 1000.0;

const BALANCE_FN: &str = "account.balance";
const DUE_FN: &str = "account.due";
const VAR_PREFIX: &str = "var.";

/// Errors raised while resolving an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("account {0:?} not found")]
    UnknownAccount(String),

    #[error("variable {0:?} not found")]
    UnknownVariable(String),

    #[error("unsupported expression {0:?}")]
    UnsupportedExpression(String),
}

/// Resolve `expr` against `snapshot`.
pub fn resolve(expr: &str, snapshot: &Snapshot) -> Result<i64, ResolveError> {
    let expr = expr.trim();

    if let Some(value) = resolve_multiplier(expr, snapshot)? {
        return Ok(value);
    }

    for function in [BALANCE_FN, DUE_FN] {
        if let Some(name) = call_argument(expr, function)? {
            return snapshot
                .accounts
                .get(name)
                .copied()
                .ok_or_else(|| ResolveError::UnknownAccount(name.to_string()));
        }
    }

    if let Some(key) = expr.strip_prefix(VAR_PREFIX).filter(|k| is_identifier(k)) {
        return snapshot
            .vars
            .get(key)
            .copied()
            .ok_or_else(|| ResolveError::UnknownVariable(key.to_string()));
    }

    if let Some(units) = parse_literal(expr) {
        return Ok(to_milliunits(units));
    }

    Err(ResolveError::UnsupportedExpression(expr.to_string()))
}

/// Convert whole currency units to milli-units, rounding half away from zero.
pub fn to_milliunits(units: f64) -> i64 {
    (units * MILLIUNITS_PER_UNIT).round() as i64
}

/// `Ok(None)` when the expression is not a literal-factor multiplication.
fn resolve_multiplier(expr: &str, snapshot: &Snapshot) -> Result<Option<i64>, ResolveError> {
    let mut parts = expr.split('*');
    let (Some(left), Some(right), None) = (parts.next(), parts.next(), parts.next()) else {
        return Ok(None);
    };
    let Some(factor) = parse_literal(left.trim()) else {
        return Ok(None);
    };
    let value = resolve(right, snapshot)?;
    Ok(Some((value as f64 * factor).round() as i64))
}

/// Extract the account name from `function("Name")`.
///
/// Returns `Ok(None)` when `expr` is not a call to `function`.
fn call_argument<'a>(expr: &'a str, function: &str) -> Result<Option<&'a str>, ResolveError> {
    let Some(rest) = expr.strip_prefix(function) else {
        return Ok(None);
    };
    let Some(args) = rest.strip_prefix('(') else {
        return Ok(None);
    };
    let name = args
        .strip_suffix(')')
        .map(|inner| inner.trim().trim_matches('"').trim_matches('\''))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ResolveError::UnsupportedExpression(expr.to_string()))?;
    Ok(Some(name))
}

/// `[A-Za-z0-9_]+`
pub(crate) fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_literal(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
