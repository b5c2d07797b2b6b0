//! command error types

use super::exit_codes;
use crate::config::UnknownRule;
use crate::rules::RuleError;

/// error returned by command execution
#[derive(Debug, Clone)]
pub struct CommandError {
    /// exit code (maps to JSON-RPC error code via -32000 - code)
    pub code: i32,
    /// error message
    pub message: String,
    /// stable error kind for machine-readable output (e.g. "missing_attribute")
    pub kind: &'static str,
    /// suggested alternatives (e.g., similar rule names)
    pub suggestions: Vec<String>,
}

impl CommandError {
    pub fn new(code: i32, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            kind,
            suggestions: Vec::new(),
        }
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_ARGS, "invalid_args", message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(exit_codes::CONFIG_ERROR, "config", message)
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(exit_codes::ERROR, "error", message)
    }

    /// check if this error has suggestions
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<RuleError> for CommandError {
    fn from(e: RuleError) -> Self {
        Self::new(exit_codes::for_rule_error(&e), e.kind(), e.to_string())
    }
}

impl From<UnknownRule> for CommandError {
    fn from(e: UnknownRule) -> Self {
        Self {
            code: exit_codes::RULE_NOT_FOUND,
            message: e.to_string(),
            kind: "rule_not_found",
            suggestions: e.suggestions,
        }
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(e: anyhow::Error) -> Self {
        // keep the specific exit code when a known error sits under context
        if let Some(rule_err) = e.downcast_ref::<RuleError>() {
            return rule_err.clone().into();
        }
        if let Some(unknown) = e.downcast_ref::<UnknownRule>() {
            return unknown.clone().into();
        }
        CommandError::general(format!("{:#}", e))
    }
}
