use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::DEFAULT_MAX_DEPTH;

pub const DEFAULT_OP: &str = "AND";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// named rule texts, e.g. "senior_sales": "age > 30 AND department = 'Sales'"
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// maximum tree depth accepted by the parser and the evaluator
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// connective used when several rules are combined and none is given
    #[serde(default = "default_op")]
    pub default_op: String,
    /// edit distance for "did you mean" suggestions on unknown rule names
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_op() -> String {
    DEFAULT_OP.to_string()
}

fn default_suggestion_threshold() -> usize {
    2
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_op: DEFAULT_OP.to_string(),
            suggestion_threshold: 2,
        }
    }
}
