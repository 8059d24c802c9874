//! Runs the `graphgate` binary end to end.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn graphgate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_graphgate"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_admitted_query_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let query = write(&dir, "q.graphql", "{ persons(limit: 5) { id } }");

    let output = graphgate(&["analyze", query.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["complexity"], 5);
    assert_eq!(report["depth"], 2);
    assert_eq!(report["admitted"], true);
}

#[test]
fn test_rejected_query_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let query = write(&dir, "q.graphql", "{ persons { id properties } }");

    let output = graphgate(&["analyze", query.to_str().unwrap(), "--max-complexity", "10"]);
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("rejected"));
}

#[test]
fn test_parse_error_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let query = write(&dir, "q.graphql", "{ persons( }");

    let output = graphgate(&["analyze", query.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error"));
}

#[test]
fn test_config_prints_effective_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "config.json", r#"{ "max_depth": 4, "complexity": { "list_multiplier": 0 } }"#);

    let output = graphgate(&["config", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["max_depth"], 4);
    assert_eq!(value["complexity"]["list_multiplier"], 10);
    assert_eq!(value["complexity"]["max_complexity"], 1000);
    assert_eq!(value["limits"]["max_limit"], 1000);
}
