#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Semantic exit codes for one-shot commands

mod common;

use common::{consel_cmd, consel_cmd_with_config, director_with_acl};
use predicates::prelude::*;

#[test]
fn resolved_command_succeeds() {
    consel_cmd()
        .args(["mount", "storage=File1"])
        .assert()
        .success()
        .stdout("Mount requested on Storage \"File1\" drive 0.\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn pool_record_by_name() {
    consel_cmd()
        .args(["pool", "pool=Incremental"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pool \"Incremental\" (PoolId 2)."));
}

#[test]
fn unknown_command_is_a_usage_error() {
    consel_cmd()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("frobnicate: is an invalid command."));
}

#[test]
fn missing_volume_exits_not_found_and_reports_once() {
    consel_cmd()
        .args(["volume", "volume=Nope"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Media record for Volume \"Nope\" not found."))
        .stderr(predicate::str::is_empty());
}

#[test]
fn batch_mode_refuses_to_choose() {
    // Given: Four storages and no storage on the command line
    // When: Mounting in batch mode
    // Then: The choices are listed and the command fails as ambiguous
    consel_cmd()
        .args(["--batch", "mount"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("     4: Loader"))
        .stdout(predicate::str::contains("Selection is not possible in batch mode."));
}

#[test]
fn batch_mode_from_environment() {
    consel_cmd()
        .env("CONSEL_BATCH", "yes")
        .arg("mount")
        .assert()
        .code(5);
}

#[test]
fn end_of_input_aborts_the_menu() {
    consel_cmd()
        .args(["mount", "storage=Tape"])
        .write_stdin("")
        .assert()
        .code(6)
        .stdout(predicate::str::contains("Select Drive:"))
        .stdout(predicate::str::contains("Selection aborted, nothing done."));
}

#[test]
fn denied_job_record_is_unauthorized() {
    // Given: A console that may only see Weekly jobs
    let (_dir, config) = director_with_acl("job = [\"Weekly\"]");

    // When: Naming a Nightly job, then typing its id at the listing prompt
    // Then: The explicit id reads as unknown, the typed one as denied
    consel_cmd_with_config(&config)
        .args(["job", "jobid=10"])
        .write_stdin("10\n")
        .assert()
        .code(4)
        .stdout(predicate::str::contains("Could not find Job \"10\""))
        .stdout(predicate::str::contains("No access to Job \"Nightly\""));
}

#[test]
fn acl_hides_denied_storages_from_menus() {
    let (_dir, config) = director_with_acl("storage = [\"File2\"]");

    consel_cmd_with_config(&config)
        .arg("mount")
        .assert()
        .success()
        .stdout(predicate::str::contains("Automatically selected Storage: File2"));
}

#[test]
fn unreadable_config_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    consel_cmd_with_config(&dir.path().join("missing.toml"))
        .arg("help")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read config"));
}
