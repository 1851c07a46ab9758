// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests running the demo flows on the memory backend

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lapse() -> Command {
    let mut cmd = Command::cargo_bin("lapse").unwrap();
    // Keep a user's config file and environment out of the way
    cmd.env_remove("LAPSE_HOST")
        .env_remove("LAPSE_PORT")
        .env_remove("LAPSE_DB")
        .env_remove("LAPSE_USERNAME")
        .env_remove("LAPSE_PASSWORD")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("lapse-cli-tests"));
    cmd
}

#[test]
fn help_lists_demos() {
    lapse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simple"))
        .stdout(predicate::str::contains("reschedule"))
        .stdout(predicate::str::contains("cancel"));
}

#[test]
fn simple_fires_callback() {
    lapse()
        .args(["simple", "--key", "keyword", "--ttl", "50ms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scheduled successfully!"))
        .stdout(predicate::str::contains("run callback for keyword: keyword"));
}

#[test]
fn reschedule_reports_both_steps() {
    lapse()
        .args([
            "reschedule",
            "--key",
            "job-2",
            "--ttl",
            "10s",
            "--new-ttl",
            "50ms",
        ])
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::contains("the task is scheduled to be run in 10s"))
        .stdout(predicate::str::contains(
            "the task is rescheduled to be run in 50ms",
        ))
        .stdout(predicate::str::contains("run callback for keyword: job-2"));
}

#[test]
fn multi_runs_added_handler_first() {
    let output = lapse()
        .args(["multi", "--key", "multi-handlers", "--ttl", "50ms"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let another = stdout.find("run another callback").unwrap();
    let callback = stdout
        .find("run callback for keyword: multi-handlers")
        .unwrap();
    assert!(another < callback, "stdout:\n{}", stdout);
}

#[test]
fn loop_stops_after_iterations() {
    let output = lapse()
        .args(["loop", "--key", "loop", "--ttl", "20ms", "--iterations", "3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("run callback for keyword: loop").count(), 3);
}

#[test]
fn cancel_prevents_callback() {
    lapse()
        .args(["cancel", "--key", "gone", "--ttl", "30ms", "--wait", "100ms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no callback fired"))
        .stdout(predicate::str::contains("run callback").not());
}

#[test]
fn config_file_selects_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "db = 3\n").unwrap();

    // The memory backend publishes on the configured database, so the demo
    // only completes if the listener subscribed to the same one
    lapse()
        .args(["--config", path.to_str().unwrap()])
        .args(["simple", "--ttl", "20ms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run callback for keyword: keyword"));
}

#[test]
fn bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a port\"\n").unwrap();

    lapse()
        .args(["--config", path.to_str().unwrap()])
        .args(["simple", "--ttl", "20ms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading config"));
}

#[test]
fn invalid_duration_is_rejected() {
    lapse()
        .args(["simple", "--ttl", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ttl"));
}
