// integration tests for parse, eval, combine and check

use crate::common::*;

const SENIOR_SALES: &str = "age > 30 AND department = 'Sales'";
const EMPLOYEE: &str = r#"{"age": 35, "department": "Sales", "experience": 7, "salary": 90000}"#;

fn sample_config() -> serde_json::Value {
    serde_json::json!({
        "rules": {
            "sales_or_marketing": "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing'))",
            "experienced": "experience > 5 AND salary < 100000",
            "tall": "height > 180"
        },
        "settings": {
            "default_op": "AND"
        }
    })
}

// ============================================================================
// eval
// ============================================================================

#[test]
fn test_eval_text_output() {
    let test_dir = create_test_dir("eval_text");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(
        &["--no-json", "eval", SENIOR_SALES, "--context", EMPLOYEE],
        &config_path,
    );

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "true\n");
    // a missing config file is not created
    assert!(!config_path.exists());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_json_output() {
    let test_dir = create_test_dir("eval_json");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(
        &[
            "--json",
            "eval",
            "age < 25 AND department = 'Marketing'",
            "-c",
            EMPLOYEE,
        ],
        &config_path,
    );

    assert!(output.status.success());
    let json = json_of(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["action"], "eval");
    assert_eq!(json["result"]["result"], false);
    assert_eq!(
        json["result"]["rule"],
        "(age < 25 AND department = 'Marketing')"
    );

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_context_file() {
    let test_dir = create_test_dir("eval_context_file");
    let config_path = test_dir.join("config.json");
    let ctx_path = test_dir.join("ctx.json");
    std::fs::write(&ctx_path, EMPLOYEE).unwrap();

    let output = run_rulekit(
        &[
            "--no-json",
            "eval",
            "salary < 100000",
            "--context-file",
            ctx_path.to_str().unwrap(),
        ],
        &config_path,
    );

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "true\n");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_error_exit_codes() {
    let test_dir = create_test_dir("eval_errors");
    let config_path = test_dir.join("config.json");

    let cases = [
        ("age", 2),
        ("age >= 30", 3),
        ("height > 100", 5),
        ("department > 5", 6),
    ];

    for (rule, code) in cases {
        let output = run_rulekit(
            &["--no-json", "eval", rule, "--context", EMPLOYEE],
            &config_path,
        );
        assert_eq!(output.status.code(), Some(code), "rule: {}", rule);
        assert!(stderr_of(&output).starts_with("error: "));
        assert!(stdout_of(&output).is_empty());
    }

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_json_error() {
    let test_dir = create_test_dir("eval_json_error");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(
        &["--json", "eval", "height > 100", "--context", EMPLOYEE],
        &config_path,
    );

    assert_eq!(output.status.code(), Some(5));
    let json = json_of(&output);
    assert_eq!(json["error"]["code"], -32005);
    assert_eq!(json["error"]["data"]["kind"], "missing_attribute");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("height"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_requires_context() {
    let test_dir = create_test_dir("eval_no_context");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(&["--no-json", "eval", SENIOR_SALES], &config_path);
    assert_eq!(output.status.code(), Some(8));

    let output = run_rulekit(
        &["--no-json", "eval", SENIOR_SALES, "--context", "not json"],
        &config_path,
    );
    assert_eq!(output.status.code(), Some(8));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_usage_error_is_invalid_args() {
    let test_dir = create_test_dir("usage_error");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(&["eval"], &config_path);
    assert_eq!(output.status.code(), Some(8));

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// parse
// ============================================================================

#[test]
fn test_parse_text_tree() {
    let test_dir = create_test_dir("parse_text");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(&["--no-json", "parse", SENIOR_SALES], &config_path);

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "AND\n├── age > 30\n└── department = 'Sales'\n"
    );

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_parse_json_with_warnings() {
    let test_dir = create_test_dir("parse_json");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(&["--json", "parse", "age >= 30 OR b = 2"], &config_path);

    // malformed operands are not a parse failure
    assert!(output.status.success());
    let json = json_of(&output);
    assert_eq!(json["result"]["ast"]["op"], "OR");
    assert_eq!(json["result"]["depth"], 2);
    assert_eq!(json["result"]["operands"], 2);
    assert_eq!(json["result"]["warnings"].as_array().unwrap().len(), 1);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_parse_respects_configured_depth() {
    let test_dir = create_test_dir("parse_depth");
    let config_path = write_config(
        &test_dir,
        &serde_json::json!({ "settings": { "max_depth": 2 } }),
    );

    let output = run_rulekit(
        &["--no-json", "parse", "a = 1 AND b = 2 AND c = 3"],
        &config_path,
    );
    assert_eq!(output.status.code(), Some(7));

    let output = run_rulekit(&["--no-json", "parse", "a = 1 AND b = 2"], &config_path);
    assert!(output.status.success());

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// combine
// ============================================================================

#[test]
fn test_combine_and_evaluate() {
    let test_dir = create_test_dir("combine");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(
        &[
            "--json",
            "combine",
            "age > 30",
            "salary < 100000",
            "--op",
            "OR",
            "--context",
            EMPLOYEE,
        ],
        &config_path,
    );

    assert!(output.status.success());
    let json = json_of(&output);
    assert_eq!(json["result"]["op"], "OR");
    assert_eq!(json["result"]["rule"], "(age > 30 OR salary < 100000)");
    assert_eq!(json["result"]["result"], true);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_combine_without_context_has_no_result() {
    let test_dir = create_test_dir("combine_no_context");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(&["--json", "combine", "a = 1", "b = 2"], &config_path);

    assert!(output.status.success());
    let json = json_of(&output);
    // default connective
    assert_eq!(json["result"]["op"], "AND");
    assert!(json["result"].get("result").is_none());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_combine_uses_configured_default_op() {
    let test_dir = create_test_dir("combine_default_op");
    let config_path = write_config(
        &test_dir,
        &serde_json::json!({ "settings": { "default_op": "OR" } }),
    );

    let output = run_rulekit(&["--no-json", "combine", "a = 1", "b = 2"], &config_path);

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "(a = 1 OR b = 2)\n");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_combine_invalid_operator() {
    let test_dir = create_test_dir("combine_invalid_op");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(
        &["--no-json", "combine", "a = 1", "b = 2", "--op", "XOR"],
        &config_path,
    );

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).contains("XOR"));

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_named_rules() {
    let test_dir = create_test_dir("check");
    let config_path = write_config(&test_dir, &sample_config());

    let output = run_rulekit(
        &[
            "--json",
            "check",
            "--rule",
            "sales_or_marketing",
            "--rule",
            "experienced",
            "--context",
            EMPLOYEE,
        ],
        &config_path,
    );

    assert!(output.status.success(), "stdout: {}", stdout_of(&output));
    let json = json_of(&output);
    assert_eq!(json["result"]["action"], "check");
    assert_eq!(json["result"]["op"], "AND");
    assert_eq!(json["result"]["result"], true);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_surfaces_missing_attribute() {
    let test_dir = create_test_dir("check_missing_attr");
    let config_path = write_config(&test_dir, &sample_config());

    let output = run_rulekit(
        &[
            "--no-json",
            "check",
            "-r",
            "experienced",
            "-r",
            "tall",
            "--op",
            "OR",
            "--context",
            EMPLOYEE,
        ],
        &config_path,
    );

    assert_eq!(output.status.code(), Some(5));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_unknown_rule_suggests() {
    let test_dir = create_test_dir("check_unknown");
    let config_path = write_config(&test_dir, &sample_config());

    let output = run_rulekit(
        &["--no-json", "check", "-r", "experiencd", "--context", EMPLOYEE],
        &config_path,
    );
    assert_eq!(output.status.code(), Some(10));
    assert!(stderr_of(&output).contains("did you mean: experienced?"));

    let output = run_rulekit(
        &["--json", "check", "-r", "experiencd", "--context", EMPLOYEE],
        &config_path,
    );
    let json = json_of(&output);
    assert_eq!(json["error"]["code"], -32010);
    assert_eq!(json["error"]["data"]["suggestions"][0], "experienced");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_quiet_suppresses_output() {
    let test_dir = create_test_dir("quiet");
    let config_path = test_dir.join("config.json");

    let output = run_rulekit(
        &["--quiet", "eval", SENIOR_SALES, "--context", EMPLOYEE],
        &config_path,
    );

    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());

    cleanup_test_dir(&test_dir);
}
