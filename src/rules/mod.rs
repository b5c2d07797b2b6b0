//! rule engine: parse, combine and evaluate boolean rules
//!
//! provides:
//! - rule text parser producing a binary AST of AND / OR operators and operands
//! - evaluation of a rule against an attribute context (integer or text values)
//! - comparison operators: >, <, =
//! - combination of existing rules under a new AND / OR root, sharing subtrees
//!
//! ```
//! use rulekit::rules::{combine_rules, create_rule, evaluate_rule, EvalContext};
//!
//! let seniors = create_rule("age > 30 AND department = 'Sales'").unwrap();
//! let budget = create_rule("salary < 100000").unwrap();
//! let rule = combine_rules(&seniors, &budget, "AND").unwrap();
//!
//! let ctx = EvalContext::new()
//!     .with("age", 35)
//!     .with("department", "Sales")
//!     .with("salary", 90000);
//! assert!(evaluate_rule(&rule, &ctx).unwrap());
//! ```

mod combine;
mod error;
mod eval;
mod parser;
mod types;

pub use combine::{combine_all, combine_rules, combine_with};
pub use error::RuleError;
pub use eval::{
    evaluate_rule, evaluate_rule_with_limit, parse_operand, validate_rule, Comparison, EvalContext,
};
pub use parser::{create_rule, create_rule_with_limit, DEFAULT_MAX_DEPTH};
pub use types::{Comparator, Connective, Node, Rule, Value};
