//! End-to-end tests for the socnet binary
//!
//! Each test runs the real binary against a scratch database in a
//! temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Scratch {
    dir: TempDir,
}

impl Scratch {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("social_network.db")
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    fn socnet(&self) -> Command {
        let mut cmd = Command::cargo_bin("socnet").expect("binary not built");
        cmd.current_dir(self.dir.path())
            .env_remove("SOCNET_DB_PATH")
            .env_remove("SOCNET_WORKER_STRATEGY")
            .env_remove("LOG_OUTPUT")
            .env("NO_COLOR", "1")
            .arg("--db")
            .arg(self.db());
        cmd
    }
}

fn accounts_csv(rows: usize) -> String {
    let mut csv = String::from("USER_ID,EMAIL,NAME,LASTNAME\n");
    for i in 0..rows {
        writeln!(csv, "user{i},user{i}@uw.edu,Name{i},Last{i}").unwrap();
    }
    csv
}

#[test]
fn test_no_arguments_prints_help() {
    Command::cargo_bin("socnet")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_load_users_in_chunks() {
    let scratch = Scratch::new();
    let csv = scratch.write("accounts.csv", &accounts_csv(250));

    scratch
        .socnet()
        .arg("load-users")
        .arg(&csv)
        .arg("--chunk-size")
        .arg("100")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chunks:     3"))
        .stdout(predicate::str::contains("Inserted:   250"))
        .stderr(predicate::str::contains("Performance time:"));

    scratch
        .socnet()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Users:    250"));
}

#[test]
fn test_load_parallel_json_report() {
    let scratch = Scratch::new();
    let csv = scratch.write("accounts.csv", &accounts_csv(30));

    let output = scratch
        .socnet()
        .args(["load-users", "--mode", "parallel", "--chunk-size", "7", "--json"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "parallel");
    assert_eq!(report["chunks"], 5);
    assert_eq!(report["inserted"], 30);
}

#[test]
fn test_load_missing_file_fails() {
    let scratch = Scratch::new();

    scratch
        .socnet()
        .arg("load-users")
        .arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_rerun_reports_duplicates() {
    let scratch = Scratch::new();
    let csv = scratch.write("accounts.csv", &accounts_csv(5));

    scratch.socnet().arg("load-users").arg(&csv).assert().success();
    scratch
        .socnet()
        .args(["load-users", "--mode", "sequential"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted:   0"))
        .stdout(predicate::str::contains("5 duplicate"));
}

#[test]
fn test_user_lifecycle() {
    let scratch = Scratch::new();

    scratch
        .socnet()
        .args(["user", "add", "dave03", "david.yuen@gmail.com", "David", "Yuen"])
        .assert()
        .success();

    scratch
        .socnet()
        .args(["user", "add", "dave03", "other@gmail.com", "David", "Yuen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contains id 'dave03'"));

    scratch
        .socnet()
        .args(["user", "update", "dave03", "dyuen@uw.edu", "Dave", "Yuen"])
        .assert()
        .success();

    scratch
        .socnet()
        .args(["user", "search", "dave03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dyuen@uw.edu"))
        .stdout(predicate::str::contains("Dave"));

    scratch
        .socnet()
        .args(["status", "add", "dave03_00001", "dave03", "Sunny in Seattle"])
        .assert()
        .success();

    scratch
        .socnet()
        .args(["user", "delete", "dave03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 status update(s) removed"));

    scratch
        .socnet()
        .args(["status", "search", "dave03_00001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_status_requires_existing_user() {
    let scratch = Scratch::new();

    scratch
        .socnet()
        .args(["status", "add", "ghost_00001", "ghost", "Boo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User 'ghost' does not exist"));
}

#[test]
fn test_clear_with_confirmation() {
    let scratch = Scratch::new();
    let csv = scratch.write("accounts.csv", &accounts_csv(3));
    scratch.socnet().arg("load-users").arg(&csv).assert().success();

    scratch
        .socnet()
        .arg("clear")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Clear cancelled"));

    scratch
        .socnet()
        .arg("clear")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database cleared"));

    scratch
        .socnet()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Users:    0"));
}
