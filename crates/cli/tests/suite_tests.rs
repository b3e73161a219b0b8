//! End-to-end tests running the driver binary against an in-process backend.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("tokengate-cli").unwrap();
    // Shrink the artificial delays so the suite finishes quickly; the
    // refresh delay stays larger than the protected delay so concurrent
    // requests still observe an in-flight refresh.
    cmd.env("DOTENV_DISABLED", "1")
        .env_remove("TOKENGATE_BASE_URL")
        .env("TOKENGATE_PROTECTED_DELAY_MS", "20")
        .env("TOKENGATE_REFRESH_DELAY_MS", "80");
    cmd
}

#[test]
fn test_full_suite_passes() {
    cmd()
        .arg("suite")
        .assert()
        .success()
        .stdout(predicate::str::contains("RESULT: PASS").count(6))
        .stdout(predicate::str::contains("RESULT: FAIL").count(0))
        .stdout(predicate::str::contains("SUITE: PASS"));
}

#[test]
fn test_single_scenario_with_refresh_success() {
    cmd()
        .args(["scenario", "--requests", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refresh calls: 1"))
        .stdout(predicate::str::contains("succeeded:     10/10"));
}

#[test]
fn test_single_scenario_with_forced_refresh_failure() {
    cmd()
        .args(["scenario", "--requests", "3", "--fail-refresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refresh calls: 1"))
        .stdout(predicate::str::contains("succeeded:     0/3"))
        .stdout(predicate::str::contains("RESULT: PASS"));
}

#[test]
fn test_unreachable_backend_reports_error() {
    cmd()
        .args(["--base-url", "http://127.0.0.1:9", "scenario"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}
