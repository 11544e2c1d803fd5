//! Output format validation tests.
//!
//! Tests JSON/JSONL output format correctness and required field presence.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

mod common;

use common::Workspace;
use serde_json::Value;

#[test]
fn test_jsonl_one_object_per_image() {
    let ws = Workspace::new().with_photos();

    let output = ws
        .cmd()
        .args(["batch", "a.jpg", "b.jpg", "missing.jpg", "--format", "jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let records: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 3);
    for record in &records {
        assert!(record.is_object());
        assert!(record["path"].is_string());
        assert!(record["timestamp"].is_string());
    }
    assert_eq!(records[2]["status"], "failed");
    assert!(records[2]["error"]
        .as_str()
        .unwrap()
        .contains("missing.jpg"));
}

#[test]
fn test_json_array_required_fields() {
    let ws = Workspace::new().with_photos();

    let output = ws
        .cmd()
        .args(["batch", "a.jpg", "b.jpg", "--format", "json", "--pretty"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    for record in records {
        assert_eq!(record["status"], "classified");
        assert!(record["label"].is_string());
        let confidence = record["confidence"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&confidence));
    }
}

#[test]
fn test_pretty_json_is_indented() {
    let ws = Workspace::new().with_photos();

    let output = ws
        .cmd()
        .args(["batch", "a.jpg", "--format", "json", "--pretty"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().count() > 1);
}

#[test]
fn test_json_output_carries_no_text_banners() {
    let ws = Workspace::new().with_photos();

    let output = ws
        .cmd()
        .args(["batch", "a.jpg", "--format", "json"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Running predictions"));
    assert!(serde_json::from_str::<Value>(&stdout).is_ok());
}
