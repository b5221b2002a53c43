use super::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    TestContext::default()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("slashdeck"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_sync_help() {
    TestContext::default()
        .cmd()
        .args(["sync", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--guild"));
}

#[test]
fn test_unknown_subcommand_fails() {
    TestContext::default()
        .cmd()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
