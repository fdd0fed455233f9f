//! End-to-end tests of the `redisai-loader` binary.
//!
//! None of these need a running server: they cover the paths where the
//! process must report a failure and still exit normally.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SUCCESS: &str = "Model loaded successfully";
const FAILURE: &str = "❌ Error loading model";

/// Nothing listens on port 1, so connecting fails fast.
const UNREACHABLE_URL: &str = "redis://:pass123@127.0.0.1:1";

fn loader(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("redisai-loader").expect("binary");
    cmd.current_dir(dir.path())
        .env_remove("REDIS_URL")
        .env_remove("REDISAI_NO_TLS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_file_reports_error_and_exits_normally() {
    let dir = TempDir::new().expect("temp dir");

    loader(&dir)
        .env("REDIS_URL", UNREACHABLE_URL)
        .assert()
        .success()
        .stdout(predicate::str::contains(FAILURE))
        .stdout(predicate::str::contains("career_model.pt"))
        .stdout(predicate::str::contains(SUCCESS).not());
}

#[test]
fn test_unreachable_store_reports_error_and_exits_normally() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("career_model.pt"), [0x80, 0x02, 0x8a]).expect("write model");

    loader(&dir)
        .env("REDIS_URL", UNREACHABLE_URL)
        .args(["--timeout", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(FAILURE))
        .stdout(predicate::str::contains("connection failed"))
        .stdout(predicate::str::contains(SUCCESS).not());
}

#[test]
fn test_strict_exits_with_failure() {
    let dir = TempDir::new().expect("temp dir");

    loader(&dir)
        .env("REDIS_URL", UNREACHABLE_URL)
        .arg("--strict")
        .assert()
        .failure()
        .stdout(predicate::str::contains(FAILURE));
}

#[test]
fn test_missing_connection_string() {
    let dir = TempDir::new().expect("temp dir");

    loader(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("REDIS_URL"))
        .stdout(predicate::str::contains(SUCCESS).not());
}

#[test]
fn test_malformed_connection_string() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("career_model.pt"), b"model").expect("write model");

    loader(&dir)
        .env("REDIS_URL", "not a url")
        .assert()
        .success()
        .stdout(predicate::str::contains("connection string error"));
}

#[test]
fn test_upload_missing_file() {
    let dir = TempDir::new().expect("temp dir");

    loader(&dir)
        .env("REDIS_URL", UNREACHABLE_URL)
        .arg("upload")
        .assert()
        .success()
        .stdout(predicate::str::contains("career_model.onnx"))
        .stdout(predicate::str::contains(SUCCESS).not());
}

#[test]
fn test_json_error_output() {
    let dir = TempDir::new().expect("temp dir");

    let output = loader(&dir)
        .env("REDIS_URL", UNREACHABLE_URL)
        .args(["--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["status"], "error");
    assert!(
        value["error"]
            .as_str()
            .is_some_and(|e| e.contains("file not found"))
    );
}

#[test]
fn test_inspect_url_hides_password() {
    let dir = TempDir::new().expect("temp dir");

    loader(&dir)
        .env("REDIS_URL", "redis://:pass123@myhost:6379")
        .arg("inspect-url")
        .assert()
        .success()
        .stdout(predicate::str::contains("rediss://myhost:6379/0"))
        .stdout(predicate::str::contains("pass123").not());
}

#[test]
fn test_inspect_url_without_forced_tls() {
    let dir = TempDir::new().expect("temp dir");

    loader(&dir)
        .env("REDIS_URL", "redis://:pass123@myhost:6379")
        .args(["inspect-url", "--no-tls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("redis://myhost:6379/0"))
        .stdout(predicate::str::contains("TLS:      no"));
}

#[test]
fn test_no_tls_from_environment_accepts_common_values() {
    let dir = TempDir::new().expect("temp dir");

    for value in ["1", "yes", "true"] {
        loader(&dir)
            .env("REDIS_URL", "redis://:pass123@myhost:6379")
            .env("REDISAI_NO_TLS", value)
            .arg("inspect-url")
            .assert()
            .success()
            .stdout(predicate::str::contains("redis://myhost:6379/0"));
    }

    for value in ["0", "no", "false"] {
        loader(&dir)
            .env("REDIS_URL", "redis://:pass123@myhost:6379")
            .env("REDISAI_NO_TLS", value)
            .arg("inspect-url")
            .assert()
            .success()
            .stdout(predicate::str::contains("rediss://myhost:6379/0"));
    }
}

#[test]
fn test_error_line_survives_closed_stdout() {
    let dir = TempDir::new().expect("temp dir");

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("redisai-loader"))
        .current_dir(dir.path())
        .env_remove("REDISAI_NO_TLS")
        .env_remove("RUST_LOG")
        .env("REDIS_URL", UNREACHABLE_URL)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .spawn()
        .expect("spawn");
    drop(child.stdout.take());

    let status = child.wait().expect("wait");
    assert!(status.success(), "exited with {status}");
}

#[test]
fn test_invalid_backend_is_usage_error() {
    let dir = TempDir::new().expect("temp dir");

    loader(&dir)
        .args(["store", "--backend", "caffe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend"));
}
