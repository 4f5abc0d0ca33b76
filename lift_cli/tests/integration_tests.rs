//! Integration tests for the liftmap binary.
//!
//! These tests verify end-to-end behavior including:
//! - Parsing text and files into exercise lines
//! - Payload export
//! - Catalog search, add and list
//! - Readers and writers running while the catalog is rewritten

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "_comment": "Maps common exercise names to canonical exercises",
  "exercises": {
    "pull ups": {"canonical_name": "PULL_UP", "category": "PULL_UP", "muscles": ["lats", "biceps"]},
    "push ups": {"canonical_name": "PUSH_UP", "category": "PUSH_UP", "muscles": ["chest"]},
    "bench press": {"canonical_name": "BARBELL_BENCH_PRESS", "category": "BENCH_PRESS", "muscles": []}
  }
}"#;

/// Temp dir holding a seeded catalog
fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let catalog = temp_dir.path().join("exercise_map.json");
    fs::write(&catalog, CATALOG).expect("Failed to seed catalog");
    (temp_dir, catalog)
}

/// CLI isolated from the user's own config and data directories
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftmap"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let (temp_dir, _) = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Turn free-text workouts into structured strength plans",
        ));
}

#[test]
fn test_parse_text_shows_matches() {
    let (temp_dir, catalog) = setup_test_dir();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("parse")
        .arg("--name")
        .arg("Upper")
        .arg("--text")
        .arg("4x8 Pull-ups\n3x12 Push-ups")
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 'Upper' - 2 exercises"))
        .stdout(predicate::str::contains("-> PULL_UP (4x8) [100% confidence]"))
        .stdout(predicate::str::contains("-> PUSH_UP (3x12) [100% confidence]"))
        .stdout(predicate::str::contains("Warnings").not());
}

#[test]
fn test_verbose_traces_line_decisions_on_stderr() {
    let (temp_dir, catalog) = setup_test_dir();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("parse")
        .arg("-t")
        .arg("4x8 Pull-ups")
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed").not());

    cli(temp_dir.path())
        .arg("--verbose")
        .arg("--catalog")
        .arg(&catalog)
        .arg("parse")
        .arg("-t")
        .arg("4x8 Pull-ups")
        .assert()
        .success()
        .stdout(predicate::str::contains("-> PULL_UP (4x8) [100% confidence]"))
        .stderr(predicate::str::contains(
            "SetsRepsName parsed \"Pull-ups\" as PULL_UP (100%)",
        ))
        .stderr(predicate::str::contains("Loaded 3 exercises"));
}

#[test]
fn test_parse_reports_unknown_exercises() {
    let (temp_dir, catalog) = setup_test_dir();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("parse")
        .arg("-t")
        .arg("2×30 sec Dead hang")
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ Dead hang"))
        .stdout(predicate::str::contains("-> DEAD_HANG (2x30s) [0% confidence]"))
        .stdout(predicate::str::contains(
            "Low confidence mapping for 'Dead hang' -> 'DEAD_HANG' (0%)",
        ));
}

#[test]
fn test_parse_file_json_output() {
    let (temp_dir, catalog) = setup_test_dir();
    let workout = temp_dir.path().join("pull_day.txt");
    fs::write(
        &workout,
        "Warm-up\nMain:\n- 4x8-10 Pull-ups\n- Press Bench 3x5\nStretching\n",
    )
    .unwrap();

    let output = cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("parse")
        .arg("--file")
        .arg(&workout)
        .arg("--name")
        .arg("Pull Day")
        .arg("--json")
        .output()
        .expect("Failed to run liftmap");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let lines = value["parsed"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["section"], "Main");
    assert_eq!(lines[0]["target"]["high"], 10);
    assert_eq!(lines[0]["match"]["confidence"], 100);
    assert_eq!(lines[1]["match"]["entry"]["canonical_name"], "BARBELL_BENCH_PRESS");
    assert!(lines[1]["match"]["confidence"].as_u64().unwrap() >= 70);
    assert_eq!(value["payload"]["workoutName"], "Pull Day");
}

#[test]
fn test_parse_without_input_fails() {
    let (temp_dir, catalog) = setup_test_dir();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("parse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provide --text or --file"));
}

#[test]
fn test_export_prints_payload() {
    let (temp_dir, catalog) = setup_test_dir();

    let output = cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("export")
        .arg("-n")
        .arg("Push")
        .arg("-t")
        .arg("3x12 Push-ups\nPlank 60s")
        .output()
        .expect("Failed to run liftmap");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let groups = payload["workoutSegments"][0]["workoutSteps"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["numberOfIterations"], 3);
    assert_eq!(groups[0]["workoutSteps"][0]["exerciseName"], "PUSH_UP");
    assert_eq!(
        groups[1]["workoutSteps"][0]["endCondition"]["conditionTypeKey"],
        "time"
    );

    // Warnings go to stderr so stdout stays valid JSON
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Low confidence mapping for 'Plank'"));
}

#[test]
fn test_search_ranks_catalog() {
    let (temp_dir, catalog) = setup_test_dir();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("search")
        .arg("push up")
        .arg("--limit")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("push ups -> PUSH_UP (PUSH_UP)"))
        .stdout(predicate::str::contains("pull ups").not());
}

#[test]
fn test_add_then_parse_uses_new_mapping() {
    let (temp_dir, catalog) = setup_test_dir();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("add")
        .arg("Dead Hang")
        .arg("--canonical")
        .arg("DEAD_HANG")
        .arg("--category")
        .arg("HANG")
        .arg("--muscle")
        .arg("forearms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'dead hang' -> DEAD_HANG (HANG)"));

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("parse")
        .arg("-t")
        .arg("2×30 sec Dead hang")
        .assert()
        .success()
        .stdout(predicate::str::contains("[100% confidence]"))
        .stdout(predicate::str::contains("Warnings").not());

    // Untouched entries and top-level fields survive the rewrite
    let saved: Value = serde_json::from_str(&fs::read_to_string(&catalog).unwrap()).unwrap();
    assert_eq!(
        saved["_comment"],
        "Maps common exercise names to canonical exercises"
    );
    assert_eq!(saved["exercises"]["pull ups"]["muscles"][1], "biceps");
    assert_eq!(saved["exercises"]["dead hang"]["muscles"][0], "forearms");
}

#[test]
fn test_add_uses_data_dir_catalog() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = temp_dir.path().join("liftmap-data");

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("add")
        .arg("Face pulls")
        .arg("--canonical")
        .arg("FACE_PULL")
        .arg("--category")
        .arg("SHOULDER_STABILITY")
        .assert()
        .success();

    assert!(data_dir.join("exercise_map.json").exists());

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 exercises"))
        .stdout(predicate::str::contains("face pulls -> FACE_PULL (SHOULDER_STABILITY)"));
}

#[test]
fn test_list_shows_muscles() {
    let (temp_dir, catalog) = setup_test_dir();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 exercises"))
        .stdout(predicate::str::contains("pull ups -> PULL_UP (PULL_UP) [lats, biceps]"));
}

#[test]
fn test_readers_during_sequential_adds() {
    let (temp_dir, catalog) = setup_test_dir();
    let home = temp_dir.path().to_path_buf();

    // Readers always see a complete catalog thanks to the atomic rename
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let home = home.clone();
            let catalog = catalog.clone();
            thread::spawn(move || {
                cli(&home)
                    .arg("--catalog")
                    .arg(&catalog)
                    .arg("search")
                    .arg("pull up")
                    .assert()
                    .success()
                    .stdout(predicate::str::contains("pull ups"));
            })
        })
        .collect();

    for i in 0..5 {
        cli(&home)
            .arg("--catalog")
            .arg(&catalog)
            .arg("add")
            .arg(format!("Drill {}", i))
            .arg("--canonical")
            .arg(format!("DRILL_{}", i))
            .arg("--category")
            .arg("DRILL")
            .assert()
            .success();
    }

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }

    cli(&home)
        .arg("--catalog")
        .arg(&catalog)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 exercises"));
}

#[test]
fn test_parallel_adds_keep_every_mapping() {
    let (temp_dir, catalog) = setup_test_dir();
    let home = temp_dir.path().to_path_buf();

    let writers: Vec<_> = (0..6)
        .map(|i| {
            let home = home.clone();
            let catalog = catalog.clone();
            thread::spawn(move || {
                cli(&home)
                    .arg("--catalog")
                    .arg(&catalog)
                    .arg("add")
                    .arg(format!("Carry {}", i))
                    .arg("--canonical")
                    .arg(format!("CARRY_{}", i))
                    .arg("--category")
                    .arg("CARRY")
                    .assert()
                    .success();
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer thread panicked");
    }

    cli(&home)
        .arg("--catalog")
        .arg(&catalog)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("9 exercises"));
}
