//! Model command tests.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

mod common;

use common::Workspace;
use predicates::prelude::*;
use serde_json::Value;
use whats_cooking_test_support::FOOD_LABELS;

#[test]
fn test_model_path_prints_resolved_dir() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["model", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ws.model_dir().display().to_string(),
        ));
}

#[test]
fn test_model_path_warns_when_not_installed() {
    let ws = Workspace::new();

    ws.bare_cmd()
        .args(["--model-dir", "elsewhere", "model", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere"))
        .stderr(predicate::str::contains("no model installed"));
}

#[test]
fn test_model_labels() {
    let ws = Workspace::new();

    let output = ws.cmd().args(["model", "labels"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let labels: Vec<&str> = stdout
        .lines()
        .map(|l| l.split_whitespace().last().unwrap())
        .collect();
    assert_eq!(labels, FOOD_LABELS);
}

#[test]
fn test_model_labels_json() {
    let ws = Workspace::new();

    let output = ws
        .cmd()
        .args(["model", "labels", "--format", "json"])
        .output()
        .unwrap();

    let labels: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(labels, FOOD_LABELS);
}

#[test]
fn test_model_info() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["model", "info"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("YOLOv8n-cls")
                .and(predicate::str::contains("32x32"))
                .and(predicate::str::contains("Classes:  5"))
                .and(predicate::str::contains("not recorded")),
        );
}

#[test]
fn test_model_info_json() {
    let ws = Workspace::new();

    let output = ws
        .cmd()
        .args(["model", "info", "--format", "jsonl"])
        .output()
        .unwrap();

    let info: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["task"], "classify");
    assert_eq!(info["scale"], "n");
    assert_eq!(info["classes"], 5);
    assert_eq!(info["sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn test_model_info_missing_artifact() {
    let ws = Workspace::new();

    ws.bare_cmd()
        .args(["--model-dir", "nothing-here", "model", "info"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no usable model"));
}
