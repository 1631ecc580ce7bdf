use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_adhoc-query")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(["--color", "never"])
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("ADHOC_QUERY_CONFIG")
        .output()
        .expect("command should run")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(bin())
        .args(["--color", "never"])
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("ADHOC_QUERY_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("command should spawn");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("command should finish")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_decode_json_lists_clauses() {
    let output = run(&["-F", "json", "decode", r#"http.status_code="200",error="true""#]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(
        value,
        serde_json::json!([
            {"key": "http.status_code", "operator": "=", "value": "200", "condition": ""},
            {"key": "error", "operator": "=", "value": "true", "condition": ""}
        ])
    );
}

#[test]
fn test_decode_text_with_no_clauses() {
    let output = run(&["decode", "http.status_code=200 error=true"]);
    assert!(stdout(&output).contains("No clauses found."));
}

#[test]
fn test_encode_from_clause_flags() {
    let output = run(&[
        "encode", "--clause", "a", "=~", "b.*", "--clause", "c", "ne", "d",
    ]);
    assert_eq!(stdout(&output).trim_end(), r#"{a=~"b.*",c!="d"}"#);
}

#[test]
fn test_encode_without_clauses_is_empty_braces() {
    let output = run(&["encode"]);
    assert_eq!(stdout(&output).trim_end(), "{}");
}

#[test]
fn test_encode_from_stdin_warns_on_lossy_value() {
    let output = run_with_stdin(
        &["encode", "--input", "-"],
        r#"[{"key": "a", "operator": "=", "value": "say \"hi\""}]"#,
    );
    assert_eq!(stdout(&output).trim_end(), r#"{a="say "hi""}"#);
    assert!(String::from_utf8_lossy(&output.stderr).contains("will not decode back unchanged"));
}

#[test]
fn test_add_remove_change() {
    let added = run(&["add", r#"{a="1"}"#, "b", "gt", "2"]);
    assert_eq!(stdout(&added).trim_end(), r#"{a="1",b>"2"}"#);

    let changed = run(&["change", r#"{a="1",b>"2"}"#, "0", "a", "!=", "9"]);
    assert_eq!(stdout(&changed).trim_end(), r#"{a!="9",b>"2"}"#);

    let removed = run(&["remove", r#"{a!="9",b>"2"}"#, "1"]);
    assert_eq!(stdout(&removed).trim_end(), r#"{a!="9"}"#);
}

#[test]
fn test_remove_out_of_range_fails() {
    let output = run(&["remove", "{}", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
}

#[test]
fn test_unknown_operator_is_rejected() {
    let output = run(&["add", "{}", "a", "~~", "b"]);
    assert!(!output.status.success());
}

#[test]
fn test_match_filters_label_sets() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("series.jsonl");
    write_file(
        &input,
        concat!(
            "{\"client\":\"frontend\",\"server\":\"checkout\"}\n",
            "{\"client\":\"frontend\",\"server\":\"db\"}\n",
            "{\"client\":\"ios\",\"server\":\"checkout\"}\n",
        ),
    );

    let output = run(&[
        "-F",
        "json",
        "match",
        r#"{client="frontend",server!~"db.*"}"#,
        "--input",
        input.to_str().expect("utf8 path"),
    ]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(value["total"], 3);
    assert_eq!(value["matched"], 1);
    assert_eq!(value["label_sets"][0]["server"], "checkout");
}

#[test]
fn test_output_file_receives_same_text() {
    let dir = tempdir().expect("temp dir");
    let out = dir.path().join("query.txt");
    let output = run(&[
        "-o",
        out.to_str().expect("utf8 path"),
        "encode",
        "--clause",
        "client",
        "=",
        "web",
    ]);
    let printed = stdout(&output);
    let written = fs::read_to_string(&out).expect("output file should exist");
    assert_eq!(printed, written);
    assert_eq!(written.trim_end(), r#"{client="web"}"#);
}

#[test]
fn test_series_apm_toggle_json() {
    let output = run(&["-F", "json", "series", "--apm-table"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(
        value["tag_key_series"],
        serde_json::json!([
            "traces_service_graph_request_total",
            "traces_spanmetrics_calls_total"
        ])
    );
}

#[test]
fn test_unknown_key_warning_uses_profile() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("profile.toml");
    write_file(&config, "[keys]\nknown_keys = [\"client\"]\n");

    let output = run(&[
        "-c",
        config.to_str().expect("utf8 path"),
        "decode",
        r#"{client="a",sevrer="b"}"#,
    ]);
    let _ = stdout(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sevrer"), "stderr: {stderr}");
    assert!(!stderr.contains("key=client"), "stderr: {stderr}");
}

#[test]
fn test_generate_config_from_stdin() {
    let output = run_with_stdin(
        &["generate-config", "--profile-name", "edges"],
        "{\"client\":\"a\",\"server\":\"b\"}\n",
    );
    let text = stdout(&output);
    assert!(text.starts_with("# Generated by adhoc-query generate-config"));
    let body: String = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let parsed: toml::Value = toml::from_str(&body).expect("generated toml parses");
    assert_eq!(parsed["profile_name"].as_str(), Some("edges"));
    assert_eq!(
        parsed["keys"]["known_keys"],
        toml::Value::Array(vec!["client".into(), "server".into()])
    );
}

#[test]
fn test_values_starting_with_hyphen_are_accepted() {
    let encoded = run(&["encode", "--clause", "a", "=~", "-.*", "--clause", "b", "=", "1"]);
    assert_eq!(stdout(&encoded).trim_end(), r#"{a=~"-.*",b="1"}"#);

    let added = run(&["add", "{}", "a", "lt", "-5"]);
    assert_eq!(stdout(&added).trim_end(), r#"{a<"-5"}"#);

    let changed = run(&["change", r#"{a="1"}"#, "0", "a", "gt", "-0.5"]);
    assert_eq!(stdout(&changed).trim_end(), r#"{a>"-0.5"}"#);
}

fn run_failing_with_backtrace(args: &[&str]) -> String {
    let output = Command::new(bin())
        .args(["--color", "never"])
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("ADHOC_QUERY_CONFIG")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("command should run");
    assert_eq!(output.status.code(), Some(1));
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_runtime_error_is_a_single_line() {
    let stderr = run_failing_with_backtrace(&["remove", "{}", "0"]);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "stderr: {stderr}");
    assert!(lines[0].starts_with("Error: "), "stderr: {stderr}");
    assert!(lines[0].contains("out of range"), "stderr: {stderr}");
}

#[test]
fn test_config_error_chain_names_cause_once() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("missing.toml");
    let stderr = run_failing_with_backtrace(&[
        "-c",
        missing.to_str().expect("utf8 path"),
        "decode",
        "x",
    ]);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "stderr: {stderr}");
    assert!(
        lines[0].starts_with("Error: Failed to load config: Failed to read config file"),
        "stderr: {stderr}"
    );
    assert_eq!(lines[0].matches("os error").count(), 1, "stderr: {stderr}");
}
