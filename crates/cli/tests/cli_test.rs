//! # CLI Tests
//!
//! Runs the `geomind` binary without credentials and against a closed database
//! port, so every command exercises its fallback path.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// A `geomind` command isolated from the developer's environment.
fn geomind() -> Command {
    let mut cmd = Command::cargo_bin("geomind").unwrap();
    cmd.env("GEMINI_API_KEY", "")
        .env("GOOGLE_MAPS_API_KEY", "")
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", "1");
    cmd
}

#[test]
fn test_query_without_services_prints_mock_results() {
    let output = geomind()
        .arg("query")
        .arg("Best places to open a coffee shop in Porto Alegre")
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["results"].as_array().unwrap().len(), 10);
    assert!(response.get("debug").is_none());
}

#[test]
fn test_query_debug_flag_reports_sources() {
    let output = geomind()
        .args(["query", "gyms near the park", "--debug"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["debug"]["interpretation_source"], "keyword");
    assert_eq!(response["debug"]["sql_source"], "template");
}

#[test]
fn test_query_rejects_malformed_context() {
    geomind()
        .args(["query", "coffee", "--context", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--context must be valid JSON"));
}

#[test]
fn test_check_reports_disabled_services() {
    geomind()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database (PostGIS): unhealthy"))
        .stdout(predicate::str::contains("LLM (Gemini): disabled"))
        .stdout(predicate::str::contains("Interpreted by: Keyword"))
        .stdout(predicate::str::contains("Maps (Google Maps): disabled"));
}

#[test]
fn test_init_db_fails_without_database() {
    geomind().arg("init-db").assert().failure();
}
