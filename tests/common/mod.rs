//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get an mfm command with a clean environment
pub fn mfm() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("mfm"));
    cmd.env_remove("MFM_PROJECT").env_remove("MFM_LOG");
    cmd
}

/// Helper to create a starter project (sample data included) in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    mfm().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Run a command in the project and parse its JSON stdout
pub fn run_json(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = mfm()
        .current_dir(tmp.path())
        .args(["--output", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Approximate float comparison for computed kg values
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
