//! Integration tests for the `lets` binary.
//!
//! These tests run the real executable with `--config` pointing into a
//! temporary directory.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test fixture owning a temporary settings file location.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// A `lets` command using this fixture's settings file.
    fn lets(&self) -> Command {
        let mut cmd = Command::cargo_bin("lets").unwrap();
        cmd.env_remove("LETS_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config());
        cmd
    }
}

// =============================================================================
// Global flags
// =============================================================================

#[test]
fn version_flag_works() {
    Command::cargo_bin("lets")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lets"));
}

#[test]
fn missing_verb_is_a_usage_error() {
    let env = TestEnv::new();
    env.lets()
        .assert()
        .code(64)
        .stderr(predicate::str::contains("error:"))
        .stdout(predicate::str::contains("lets help"));
}

// =============================================================================
// Resolution failures
// =============================================================================

#[test]
fn unknown_verb_exits_not_found() {
    let env = TestEnv::new();
    env.lets()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown verb frobnicate"));
}

#[test]
fn unrecognized_option_exits_with_option_error() {
    let env = TestEnv::new();
    env.lets()
        .args(["completion", "--bogus"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--bogus"));
}

// =============================================================================
// Built-in verbs
// =============================================================================

#[test]
fn help_lists_builtin_verbs() {
    let env = TestEnv::new();
    env.lets()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("usage: lets [CONTEXT.]VERB"))
        .stdout(predicate::str::contains("lets.set"))
        .stdout(predicate::str::contains("lets.verbose"));
}

#[test]
fn help_for_a_verb() {
    let env = TestEnv::new();
    env.lets()
        .args(["help", "completion"])
        .assert()
        .success()
        .stdout(predicate::str::contains("usage: lets lets.completion"));
}

#[test]
fn get_shows_defaults() {
    let env = TestEnv::new();
    env.lets()
        .arg("get")
        .assert()
        .success()
        .stdout(predicate::str::contains("lets.verbose: off"));
}

#[test]
fn set_persists_to_the_settings_file() {
    let env = TestEnv::new();
    env.lets().args(["set", "verbose", "on"]).assert().success();

    let content = std::fs::read_to_string(env.config()).unwrap();
    assert!(content.contains("[lets]"));
    assert!(content.contains("verbose = \"on\""));

    env.lets()
        .args(["get", "lets.verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lets.verbose: on"))
        .stderr(predicate::str::contains("running lets.get"));
}

#[test]
fn set_rejects_values_outside_choices() {
    let env = TestEnv::new();
    env.lets()
        .args(["set", "verbose", "loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loud"));
    assert!(!env.config().exists());
}

#[test]
fn set_without_value_is_a_usage_error() {
    let env = TestEnv::new();
    env.lets().args(["set", "verbose"]).assert().code(64);
}

#[test]
fn get_unknown_setting_fails() {
    let env = TestEnv::new();
    env.lets()
        .args(["get", "nothing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nothing"));
}

#[test]
fn get_json() {
    let env = TestEnv::new();
    env.lets()
        .args(["get", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lets.verbose\": \"off\""));
}

#[test]
fn completion_bash() {
    let env = TestEnv::new();
    env.lets()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_lets"))
        .stdout(predicate::str::contains("lets.completion"));
}

#[test]
fn quiet_suppresses_output() {
    let env = TestEnv::new();
    env.lets()
        .args(["-q", "get"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn config_env_is_honored() {
    let env = TestEnv::new();
    Command::cargo_bin("lets")
        .unwrap()
        .env("LETS_CONFIG", env.config())
        .args(["set", "verbose", "on"])
        .assert()
        .success();
    assert!(env.config().exists());
}
