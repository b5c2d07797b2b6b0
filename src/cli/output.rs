//! output formatting utilities for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}
//!
//! also renders rule trees for human-readable output

use serde::Serialize;
use std::io::IsTerminal;

use crate::rules::Node;

/// JSON-RPC version constant
const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// error code (rulekit exit code, offset by -32000 for app-specific errors)
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// additional error data
#[derive(Serialize)]
pub struct ErrorData {
    /// stable error kind, e.g. "missing_attribute"
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl JsonRpcError {
    /// create error with standard JSON-RPC error code range
    /// rulekit uses -32000 to -32099 for application errors (per JSON-RPC spec)
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_data(
        code: i32,
        message: impl Into<String>,
        kind: &'static str,
        suggestions: Vec<String>,
    ) -> Self {
        let mut error = Self::new(code, message);
        error.error.data = Some(ErrorData {
            kind,
            suggestions: if suggestions.is_empty() {
                None
            } else {
                Some(suggestions)
            },
        });
        error
    }
}

/// convert rulekit exit code to JSON-RPC error code
/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(code: i32) -> i32 {
    -32000 - code
}

// ============================================================================
// Result data structures for different commands
// ============================================================================

/// result data for parse
#[derive(Serialize)]
pub struct ParseData<'a> {
    pub action: &'static str,
    /// fully parenthesized rule text that parses back to `ast`
    /// (exact as long as operands have balanced parentheses)
    pub rule: String,
    pub depth: usize,
    pub operands: usize,
    pub ast: &'a Node,
    /// operands that will fail at evaluation time regardless of context
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// result data for eval
#[derive(Serialize)]
pub struct EvalData {
    pub action: &'static str,
    pub rule: String,
    pub result: bool,
}

/// result data for combine
#[derive(Serialize)]
pub struct CombineData<'a> {
    pub action: &'static str,
    pub op: &'static str,
    pub rule: String,
    pub ast: &'a Node,
    /// present only when a context was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,
}

/// result data for check (named rules from the config)
#[derive(Serialize)]
pub struct CheckData {
    pub action: &'static str,
    pub rules: Vec<String>,
    pub op: &'static str,
    pub rule: String,
    pub result: bool,
}

/// result data for config verify
#[derive(Serialize)]
pub struct VerifyData {
    pub action: &'static str,
    pub path: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

// ============================================================================
// Output functions
// ============================================================================

/// render a rule tree with box-drawing branches
///
/// ```text
/// OR
/// ├── age > 30
/// └── department = 'Sales'
/// ```
pub fn render_tree(node: &Node) -> String {
    let mut out = String::new();
    render_node(node, "", None, &mut out);
    out
}

fn render_node(node: &Node, prefix: &str, is_last: Option<bool>, out: &mut String) {
    let (branch, child_prefix) = match is_last {
        None => ("", String::new()),
        Some(true) => ("└── ", format!("{}    ", prefix)),
        Some(false) => ("├── ", format!("{}│   ", prefix)),
    };

    out.push_str(prefix);
    out.push_str(branch);

    match node {
        Node::Operand { value } => {
            out.push_str(value);
            out.push('\n');
        }
        Node::Operator { op, left, right } => {
            out.push_str(op.as_str());
            out.push('\n');
            render_node(left, &child_prefix, Some(false), out);
            render_node(right, &child_prefix, Some(true), out);
        }
    }
}

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error to stdout
pub fn print_json_error(code: i32, message: &str, kind: &'static str, suggestions: Vec<String>) {
    let error = JsonRpcError::with_data(code, message, kind, suggestions);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}
