//! rule evaluator
//!
//! evaluates a rule AST against a caller-supplied attribute context

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::RuleError;
use super::parser::DEFAULT_MAX_DEPTH;
use super::types::{Comparator, Node, Value};

/// attribute values a rule is evaluated against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvalContext {
    values: HashMap<String, Value>,
}

impl EvalContext {
    /// create an empty evaluation context
    pub fn new() -> Self {
        Self::default()
    }

    /// add an attribute value
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(attribute, value);
        self
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(attribute.into(), value.into());
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, Value>> for EvalContext {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for EvalContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// an operand split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison<'a> {
    pub attribute: &'a str,
    pub comparator: Comparator,
    pub literal: Value,
}

/// split operand text into attribute, comparator and literal
///
/// the literal is an integer when it is made of ASCII digits only, otherwise
/// text with at most one leading and one trailing `'` removed
pub fn parse_operand(text: &str) -> Result<Comparison<'_>, RuleError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    if tokens.len() != 3 {
        return Err(RuleError::format(
            text,
            format!("expected 'attribute comparator value', got {} token(s)", tokens.len()),
        ));
    }
    let (attribute, comparator, literal) = (tokens[0], tokens[1], tokens[2]);

    let literal = parse_literal(text, literal)?;

    let comparator = Comparator::parse(comparator).ok_or_else(|| RuleError::UnknownOperator {
        operator: comparator.to_string(),
        operand: text.to_string(),
    })?;

    Ok(Comparison {
        attribute,
        comparator,
        literal,
    })
}

fn parse_literal(operand: &str, raw: &str) -> Result<Value, RuleError> {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| RuleError::format(operand, format!("integer '{}' out of range", raw)));
    }

    let raw = raw.strip_prefix('\'').unwrap_or(raw);
    let raw = raw.strip_suffix('\'').unwrap_or(raw);
    Ok(Value::Text(raw.to_string()))
}

/// evaluate a rule against the given context using [`DEFAULT_MAX_DEPTH`]
pub fn evaluate_rule(rule: &Node, ctx: &EvalContext) -> Result<bool, RuleError> {
    evaluate_rule_with_limit(rule, ctx, DEFAULT_MAX_DEPTH)
}

/// evaluate a rule, failing once the walk gets deeper than `max_depth`
pub fn evaluate_rule_with_limit(
    rule: &Node,
    ctx: &EvalContext,
    max_depth: usize,
) -> Result<bool, RuleError> {
    evaluate_internal(rule, ctx, 1, max_depth)
}

fn evaluate_internal(
    rule: &Node,
    ctx: &EvalContext,
    depth: usize,
    max_depth: usize,
) -> Result<bool, RuleError> {
    if depth > max_depth {
        return Err(RuleError::RecursionLimit(max_depth));
    }

    match rule {
        Node::Operand { value } => evaluate_operand(value, ctx),
        Node::Operator { op, left, right } => {
            // both sides always run so an error on the right is never hidden
            let left = evaluate_internal(left, ctx, depth + 1, max_depth)?;
            let right = evaluate_internal(right, ctx, depth + 1, max_depth)?;
            Ok(op.apply(left, right))
        }
    }
}

fn evaluate_operand(text: &str, ctx: &EvalContext) -> Result<bool, RuleError> {
    let comparison = parse_operand(text)?;

    let actual = ctx
        .get(comparison.attribute)
        .ok_or_else(|| RuleError::MissingAttribute(comparison.attribute.to_string()))?;

    let result = compare(comparison.comparator, actual, &comparison.literal, text)?;
    trace!(operand = text, %actual, result, "evaluated operand");
    Ok(result)
}

// ============================================================================
// Comparison Helpers
// ============================================================================

fn compare(
    comparator: Comparator,
    actual: &Value,
    expected: &Value,
    operand: &str,
) -> Result<bool, RuleError> {
    match comparator {
        // values of different kinds are simply unequal
        Comparator::Eq => Ok(actual == expected),
        Comparator::Gt => Ok(order(actual, expected, operand)? == Ordering::Greater),
        Comparator::Lt => Ok(order(actual, expected, operand)? == Ordering::Less),
    }
}

fn order(actual: &Value, expected: &Value, operand: &str) -> Result<Ordering, RuleError> {
    match (actual, expected) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        _ => Err(RuleError::TypeMismatch {
            operand: operand.to_string(),
            actual: actual.kind(),
            expected: expected.kind(),
        }),
    }
}

/// check every operand of a rule without a context
///
/// reports the problems evaluation would hit regardless of the context:
/// bad operand format, out of range literals and unknown comparators
pub fn validate_rule(rule: &Node) -> Vec<RuleError> {
    rule.operands()
        .into_iter()
        .filter_map(|operand| parse_operand(operand).err())
        .collect()
}
