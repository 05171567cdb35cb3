//! Smoke tests for the mapwidgets binary's non-interactive commands

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn mapwidgets() -> Command {
    let mut cmd = Command::cargo_bin("mapwidgets").unwrap();
    cmd.env_remove("MAPWIDGETS_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    mapwidgets()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_config_path_follows_env() {
    mapwidgets()
        .env("MAPWIDGETS_CONFIG", "/tmp/mapwidgets-smoke.toml")
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/mapwidgets-smoke.toml"));
}

#[test]
fn test_config_show_reads_custom_caption() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[frame]\ncaption = \"cmd> \"").unwrap();

    mapwidgets()
        .arg("--config")
        .arg(file.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("caption = \"cmd> \""))
        .stdout(predicate::str::contains("confirm_suffix = \" [y/n]\""));
}

#[test]
fn test_config_show_missing_file_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    mapwidgets()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[keys]"));
}

#[test]
fn test_invalid_config_fails() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[frame\ncaption =").unwrap();

    mapwidgets()
        .arg("--config")
        .arg(file.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid TOML"));
}

#[test]
fn test_completions_bash() {
    mapwidgets()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mapwidgets"));
}
