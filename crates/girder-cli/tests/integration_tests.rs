//! Integration tests for the `girder` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `girder` command whose default config location is an empty temp dir.
fn girder(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("girder").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env_remove("GIRDER__REGISTRY__FAIL_FAST")
        .env_remove("GIRDER__REGISTRY__LOOKUP_TIMEOUT_MS");
    cmd
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_shows_every_document() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-ci"))
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("broken"))
        .stdout(predicate::str::contains("dangling"));
}

#[test]
fn test_list_csv() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .args(["list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("name,description\n"))
        .stdout(predicate::str::contains("rust-ci,\""));
}

#[test]
fn test_translate_rust_ci() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .args(["translate", "rust-ci"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline rust-ci"))
        .stdout(predicate::str::contains("test-stable"))
        .stdout(predicate::str::contains("test-nightly-wasm32-unknown-unknown"))
        .stdout(predicate::str::contains("needs: lint"))
        .stdout(predicate::str::contains("Translated 'rust-ci'"));
}

#[test]
fn test_translate_release_shows_registry() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .args(["translate", "release", "--show-registry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("needs: verify, build"))
        .stdout(predicate::str::contains("Registry (3 entries)"))
        .stdout(predicate::str::contains("Job:build"))
        .stdout(predicate::str::contains("Job:publish"));
}

#[test]
fn test_quiet_translate_prints_nothing() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .args(["--quiet", "translate", "rust-ci"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_init_then_config_path() {
    let home = TempDir::new().unwrap();

    let path = girder(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let path = String::from_utf8(path).unwrap().trim().to_string();

    girder(&home).arg("init").assert().success();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[registry]"));
    assert!(written.contains("lookup_timeout_ms = 5000"));

    // A second init leaves the file alone.
    girder(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_default_config_file_is_read() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("girder");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "[registry]\non_duplicate = \"keep-first\"\n").unwrap();

    girder(&home)
        .args(["config", "get", "registry.on_duplicate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("registry.on_duplicate = keep-first"));
}

#[test]
fn test_config_get_default() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .args(["config", "get", "registry.lookup_timeout_ms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("registry.lookup_timeout_ms = 5000"));
}

#[test]
fn test_config_list() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[registry]"))
        .stdout(predicate::str::contains("[output]"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    girder(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("girder"));
}
