// library crate for rulekit
// the rule engine lives in `rules`, the binary and generate-man use `cli`

pub mod cli;
pub mod config;
pub mod logging;
pub mod rules;
