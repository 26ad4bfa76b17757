//! End-to-end tests for the wayfarer binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const DATASET: &str = r#"{
    "countries": [
        {"id": 1, "name": "Japan", "description": "islands and mountains", "categories": ["culture"]}
    ],
    "temples": [
        {"id": 2, "name": "Kyoto", "description": "ancient temples and gardens", "categories": ["culture", "nature"]}
    ],
    "beaches": [
        {"id": 3, "name": "Bora Bora", "description": "lagoon", "categories": ["relaxation"]}
    ]
}"#;

fn dataset_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(DATASET.as_bytes()).unwrap();
    file
}

fn wayfarer() -> Command {
    let mut cmd = Command::cargo_bin("wayfarer").unwrap();
    cmd.env_remove("WAYFARER_DATASET")
        .env_remove("WAYFARER_THRESHOLD")
        .env_remove("WAYFARER_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn search_finds_typo() {
    let file = dataset_file();
    wayfarer()
        .args(["search", "kioto", "--dataset"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Kyoto"))
        .stdout(predicate::str::contains("match 135%"));
}

#[test]
fn search_json_output() {
    let file = dataset_file();
    let output = wayfarer()
        .args(["search", "kyoto", "--json", "--dataset"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["record"]["name"], "Kyoto");
}

#[test]
fn search_html_renders_empty_state() {
    let file = dataset_file();
    wayfarer()
        .args(["search", "zzzzz", "--html", "--dataset"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"class="empty""#))
        .stdout(predicate::str::contains("error-state").not());
}

#[test]
fn short_query_does_not_search() {
    wayfarer()
        .args(["search", "ky", "--dataset", "/nonexistent/database.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("shorter than 3"));
}

#[test]
fn missing_dataset_fails() {
    wayfarer()
        .args(["search", "kyoto", "--dataset", "/nonexistent/database.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dataset unavailable"));
}

#[test]
fn invalid_threshold_is_config_error() {
    wayfarer()
        .args(["config", "--threshold", "1.5"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("matching.threshold"));
}

#[test]
fn dataset_lists_groups() {
    let file = dataset_file();
    wayfarer()
        .args(["dataset", "--dataset"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("temples"))
        .stdout(predicate::str::contains("3 destinations in 3 groups"));
}

#[test]
fn config_prints_defaults() {
    wayfarer()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("debounce_ms = 300"))
        .stdout(predicate::str::contains("threshold = 0.4"));
}

#[test]
fn watch_collapses_piped_lines() {
    let file = dataset_file();
    wayfarer()
        .args(["watch", "--dataset"])
        .arg(file.path())
        .write_stdin("ky\nkyo\nkioto\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kyoto Match: 135%"));
}
