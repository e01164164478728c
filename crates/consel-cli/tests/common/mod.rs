#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

#[allow(dead_code)]
/// Path of the demo director shared with the unit tests.
pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/director.toml")
}

/// Create a `consel` command that talks to the fixture director.
/// Mode overrides from the caller's environment are cleared.
#[allow(dead_code)]
pub fn consel_cmd() -> Command {
    consel_cmd_with_config(&fixture_path())
}

#[allow(dead_code)]
pub fn consel_cmd_with_config(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("consel"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("CONSEL_CONFIG", config);
    cmd.env_remove("CONSEL_BATCH");
    cmd.env_remove("CONSEL_API");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write the fixture director plus an `[acl]` table into a temp dir.
#[allow(dead_code)]
pub fn director_with_acl(acl: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create config dir for tests");
    let path = dir.path().join("director.toml");
    let fixture = std::fs::read_to_string(fixture_path()).expect("fixture director");
    std::fs::write(&path, format!("[acl]\n{acl}\n\n{fixture}")).expect("write director");
    (dir, path)
}
