//! core types for the rule engine

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::RuleError;
use super::parser::is_paren_wrapped;

/// shared handle to a rule tree
///
/// trees are immutable once built, so subtrees are shared by reference count
/// instead of being copied when rules are combined
pub type Rule = Arc<Node>;

/// logical connective joining two subrules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Connective {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl Connective {
    /// keyword as it appears in rule text
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    /// apply the connective to two already evaluated sides
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            Connective::And => left && right,
            Connective::Or => left || right,
        }
    }
}

impl FromStr for Connective {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Connective::And),
            "OR" => Ok(Connective::Or),
            other => Err(RuleError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// comparison operators allowed inside an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// greater than: >
    Gt,
    /// less than: <
    Lt,
    /// equality: =
    Eq,
}

impl Comparator {
    /// parse comparator token
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ">" => Some(Comparator::Gt),
            "<" => Some(Comparator::Lt),
            "=" => Some(Comparator::Eq),
            _ => None,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Gt => write!(f, ">"),
            Comparator::Lt => write!(f, "<"),
            Comparator::Eq => write!(f, "="),
        }
    }
}

/// a value in the evaluation context or a literal inside an operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// integer value
    Integer(i64),
    /// string value
    Text(String),
}

impl Value {
    /// short name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
        }
    }

    /// try to get as integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Integer(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// a node of the rule AST
///
/// operators are always internal with exactly two children, operands are
/// always leaves. operand text is kept verbatim and only split into
/// attribute/comparator/value when evaluated.
///
/// the depth limit is enforced only by the parser and the evaluator.
/// `depth`, `operands`, `Display` and dropping a tree all recurse without a
/// bound, so trees built with `combine_*` should be checked with
/// `evaluate_rule_with_limit` (or kept shallow) before walking them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// two subrules joined by AND / OR
    Operator {
        op: Connective,
        left: Rule,
        right: Rule,
    },
    /// a single comparison, e.g. `age > 30`
    Operand { value: String },
}

impl Node {
    /// create an operator node
    pub fn operator(op: Connective, left: Rule, right: Rule) -> Rule {
        Arc::new(Node::Operator { op, left, right })
    }

    /// create an operand leaf from raw text
    pub fn operand(text: impl Into<String>) -> Rule {
        Arc::new(Node::Operand { value: text.into() })
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Node::Operand { .. })
    }

    /// number of levels in the tree (a lone operand has depth 1)
    pub fn depth(&self) -> usize {
        match self {
            Node::Operand { .. } => 1,
            Node::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// operand texts in left-to-right order
    pub fn operands(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_operands(&mut out);
        out
    }

    fn collect_operands<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Operand { value } => out.push(value),
            Node::Operator { left, right, .. } => {
                left.collect_operands(out);
                right.collect_operands(out);
            }
        }
    }
}

/// renders rule text that parses back to the same tree
///
/// operators become `(left OP right)`. an operand the parser would unwrap,
/// like `(a = 1)`, gets one extra pair so it survives re-parsing. the round
/// trip holds when every operand has balanced parentheses and no AND / OR
/// outside them, which covers every operand the parser produces from
/// balanced input.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Operand { value } if is_paren_wrapped(value) => write!(f, "({})", value),
            Node::Operand { value } => write!(f, "{}", value),
            Node::Operator { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
