//! rule parser - converts rule text to a rule AST
//!
//! grammar (informal):
//! - rule := "(" rule ")" | rule CONNECTIVE rule | operand
//! - CONNECTIVE := "AND" | "OR"
//!
//! there is no precedence between AND and OR: the leftmost connective outside
//! parentheses splits the text, so `a AND b OR c` parses as `a AND (b OR c)`.
//!
//! connectives are found by a plain substring scan, not by tokens. any
//! attribute or value containing "AND" / "OR" (e.g. `'ORANGE'`) is split as
//! if it were a connective. operand text is never validated here; malformed
//! operands only fail when evaluated.

use tracing::{debug, trace};

use super::error::RuleError;
use super::types::{Connective, Node, Rule};

/// default bound on tree depth for parsing and evaluation
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// parse rule text into a rule AST using [`DEFAULT_MAX_DEPTH`]
///
/// # Returns
/// * `Ok(Rule)` - the root of the parsed tree
/// * `Err(RuleError::RecursionLimit)` - if the tree would be deeper than the limit
pub fn create_rule(text: &str) -> Result<Rule, RuleError> {
    create_rule_with_limit(text, DEFAULT_MAX_DEPTH)
}

/// parse rule text into a rule AST, failing once the tree gets deeper than `max_depth`
pub fn create_rule_with_limit(text: &str, max_depth: usize) -> Result<Rule, RuleError> {
    let rule = parse_internal(text, 1, max_depth)?;
    debug!(depth = rule.depth(), rule = %rule, "parsed rule");
    Ok(rule)
}

fn parse_internal(text: &str, depth: usize, max_depth: usize) -> Result<Rule, RuleError> {
    if depth > max_depth {
        return Err(RuleError::RecursionLimit(max_depth));
    }

    let text = strip_outer_parens(text.trim());

    match find_connective(text) {
        Some((pos, op)) => {
            let left = &text[..pos];
            let right = &text[pos + op.as_str().len()..];
            trace!(%op, left, right, depth, "split rule");

            let left = parse_internal(left, depth + 1, max_depth)?;
            let right = parse_internal(right, depth + 1, max_depth)?;
            Ok(Node::operator(op, left, right))
        }
        None => Ok(Node::operand(text)),
    }
}

/// strip one leading '(' and one trailing ')' if both are present
///
/// purely positional: `(a) AND (b)` becomes `a) AND (b`
fn strip_outer_parens(text: &str) -> &str {
    if is_paren_wrapped(text) {
        text[1..text.len() - 1].trim()
    } else {
        text
    }
}

/// true when the parser would strip a leading '(' and trailing ')' from `text`
pub(crate) fn is_paren_wrapped(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('(') && text.ends_with(')')
}

/// find the leftmost AND / OR at paren depth 0
///
/// works on bytes: both keywords are ASCII so any match index is a char boundary
fn find_connective(text: &str) -> Option<(usize, Connective)> {
    let bytes = text.as_bytes();
    let mut depth: isize = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 0 => {
                let rest = &bytes[i..];
                if rest.starts_with(b"AND") {
                    return Some((i, Connective::And));
                }
                if rest.starts_with(b"OR") {
                    return Some((i, Connective::Or));
                }
            }
            _ => {}
        }
    }

    None
}
