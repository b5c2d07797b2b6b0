//! exit codes for rulekit commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

use crate::rules::RuleError;

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// operand is not `attribute comparator value`
pub const FORMAT_ERROR: i32 = 2;

/// operand uses a comparator other than >, <, =
pub const UNKNOWN_OPERATOR: i32 = 3;

/// rules combined with a connective other than AND / OR
pub const INVALID_OPERATOR: i32 = 4;

/// context has no value for an attribute used by the rule
pub const MISSING_ATTRIBUTE: i32 = 5;

/// ordered comparison between an integer and a text value
pub const TYPE_MISMATCH: i32 = 6;

/// rule nested deeper than settings.max_depth
pub const RECURSION_LIMIT: i32 = 7;

/// invalid command-line arguments (e.g. malformed context JSON)
pub const INVALID_ARGS: i32 = 8;

/// configuration file error
pub const CONFIG_ERROR: i32 = 9;

/// named rule not defined in the config
pub const RULE_NOT_FOUND: i32 = 10;

/// exit code for a rule engine error
pub fn for_rule_error(e: &RuleError) -> i32 {
    match e {
        RuleError::Format { .. } => FORMAT_ERROR,
        RuleError::UnknownOperator { .. } => UNKNOWN_OPERATOR,
        RuleError::InvalidOperator(_) => INVALID_OPERATOR,
        RuleError::MissingAttribute(_) => MISSING_ATTRIBUTE,
        RuleError::TypeMismatch { .. } => TYPE_MISMATCH,
        RuleError::RecursionLimit(_) => RECURSION_LIMIT,
    }
}
