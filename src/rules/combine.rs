//! rule combinator - joins two existing rules under a new connective

use std::sync::Arc;

use tracing::{debug, trace};

use super::error::RuleError;
use super::types::{Connective, Node, Rule};

/// combine two rules into `(a op b)`
///
/// `op` must be exactly "AND" or "OR". the new root references both inputs
/// directly; nothing is copied, so the result shares its subtrees with `a`
/// and `b`.
pub fn combine_rules(a: &Rule, b: &Rule, op: &str) -> Result<Rule, RuleError> {
    let op: Connective = op.parse()?;
    Ok(combine_with(a, b, op))
}

/// combine two rules with an already validated connective
pub fn combine_with(a: &Rule, b: &Rule, op: Connective) -> Rule {
    trace!(%op, "combining rules");
    Node::operator(op, Arc::clone(a), Arc::clone(b))
}

/// fold a list of rules left to right: `((r1 op r2) op r3) ...`
///
/// returns `None` for an empty list. the result is not depth checked; a
/// long list gives a tree as deep as the list is long
pub fn combine_all<'a, I>(rules: I, op: Connective) -> Option<Rule>
where
    I: IntoIterator<Item = &'a Rule>,
{
    let mut iter = rules.into_iter();
    let first = Arc::clone(iter.next()?);

    let mut count = 1;
    let combined = iter.fold(first, |acc, rule| {
        count += 1;
        combine_with(&acc, rule, op)
    });
    debug!(%op, rules = count, "combined rules");
    Some(combined)
}
