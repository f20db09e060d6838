//! Top-level CLI surface

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .lattice()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn fetch_help_documents_timeout_format() {
    Project::empty()
        .lattice()
        .args(["fetch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("500ms"));
}

#[test]
fn unknown_command_fails() {
    Project::empty()
        .lattice()
        .arg("publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn version_flag() {
    Project::empty()
        .lattice()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("lattice "));
}
