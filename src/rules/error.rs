//! rule engine error types

use thiserror::Error;

/// errors raised while parsing, combining or evaluating rules
///
/// parsing only fails on the recursion guard; everything else surfaces at
/// evaluation or combination time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// operand text is not `attribute comparator value`
    #[error("invalid operand format: '{operand}': {reason}")]
    Format { operand: String, reason: String },

    /// comparator inside an operand is not one of >, <, =
    #[error("unknown operator '{operator}' in operand '{operand}'")]
    UnknownOperator { operator: String, operand: String },

    /// connective passed to combine is not AND / OR
    #[error("invalid operator: '{0}', use 'AND' or 'OR'")]
    InvalidOperator(String),

    /// context has no value for the attribute
    #[error("missing attribute '{0}' in evaluation context")]
    MissingAttribute(String),

    /// ordered comparison across value kinds
    #[error("type mismatch in '{operand}': cannot compare {actual} with {expected}")]
    TypeMismatch {
        operand: String,
        actual: &'static str,
        expected: &'static str,
    },

    /// nesting deeper than the configured maximum
    #[error("rule nesting exceeds maximum depth of {0}")]
    RecursionLimit(usize),
}

impl RuleError {
    pub(crate) fn format(operand: &str, reason: impl Into<String>) -> Self {
        RuleError::Format {
            operand: operand.to_string(),
            reason: reason.into(),
        }
    }

    /// stable name of the error kind, used in machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            RuleError::Format { .. } => "format",
            RuleError::UnknownOperator { .. } => "unknown_operator",
            RuleError::InvalidOperator(_) => "invalid_operator",
            RuleError::MissingAttribute(_) => "missing_attribute",
            RuleError::TypeMismatch { .. } => "type_mismatch",
            RuleError::RecursionLimit(_) => "recursion_limit",
        }
    }
}
