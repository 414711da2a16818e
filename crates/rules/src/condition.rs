//! `left OP right` conditions.

use std::fmt;

use crate::resolver::{resolve, ResolveError};
use crate::snapshot::Snapshot;

/// Two-character operators come first so `<=` is never read as `<`.
const OPERATORS: [(&str, Comparison); 6] = [
    ("<=", Comparison::Le),
    (">=", Comparison::Ge),
    ("==", Comparison::Eq),
    ("!=", Comparison::Ne),
    ("<", Comparison::Lt),
    (">", Comparison::Gt),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    pub fn apply(self, left: i64, right: i64) -> bool {
        match self {
            Self::Lt => left < right,
            Self::Le => left <= right,
            Self::Gt => left > right,
            Self::Ge => left >= right,
            Self::Eq => left == right,
            Self::Ne => left != right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Which operand failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("malformed condition {0:?}")]
    Malformed(String),
}

/// A split but unresolved condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition<'a> {
    pub left: &'a str,
    pub op: Comparison,
    pub right: &'a str,
}

impl<'a> Condition<'a> {
    /// Split at the first operator occurrence that leaves both sides non-empty.
    pub fn parse(text: &'a str) -> Result<Self, ConditionError> {
        for (idx, _) in text.char_indices().skip(1) {
            let rest = &text[idx..];
            let Some((symbol, op)) = OPERATORS.iter().find(|(symbol, _)| rest.starts_with(symbol))
            else {
                continue;
            };
            let left = text[..idx].trim();
            let right = rest[symbol.len()..].trim();
            if !left.is_empty() && !right.is_empty() {
                return Ok(Self { left, op: *op, right });
            }
        }
        Err(ConditionError::Malformed(text.to_string()))
    }

    /// Resolve both operands and compare.
    pub fn evaluate(&self, snapshot: &Snapshot) -> Result<bool, (Side, ResolveError)> {
        let left = resolve(self.left, snapshot).map_err(|e| (Side::Left, e))?;
        let right = resolve(self.right, snapshot).map_err(|e| (Side::Right, e))?;
        Ok(self.op.apply(left, right))
    }
}
