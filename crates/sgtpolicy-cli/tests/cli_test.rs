//! Integration tests for the `sgtpolicy` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling -- all without requiring a live DNA Center.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `sgtpolicy` binary with env isolation.
///
/// Clears all `DNAC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sgtpolicy_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sgtpolicy");
    cmd.env("HOME", "/tmp/sgtpolicy-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sgtpolicy-cli-test-nonexistent")
        .env_remove("DNAC_PROFILE")
        .env_remove("DNAC_CONTROLLER")
        .env_remove("DNAC_USERNAME")
        .env_remove("DNAC_PASSWORD")
        .env_remove("DNAC_OUTPUT")
        .env_remove("DNAC_INSECURE")
        .env_remove("DNAC_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sgtpolicy_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sgtpolicy_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("group-based policy")
            .and(predicate::str::contains("sgt"))
            .and(predicate::str::contains("contract"))
            .and(predicate::str::contains("policy"))
            .and(predicate::str::contains("deploy")),
    );
}

#[test]
fn test_version_flag() {
    sgtpolicy_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sgtpolicy"));
}

#[test]
fn test_subcommand_help() {
    sgtpolicy_cmd().args(["sgt", "--help"]).assert().success().stdout(
        predicate::str::contains("create")
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("check")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sgtpolicy_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sgtpolicy_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_missing_config_fails_cleanly() {
    // No profile, no --controller: must fail before any network call.
    let output = sgtpolicy_cmd().args(["sgt", "list"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("Configuration file not found") || text.contains("config"),
        "unexpected output:\n{text}"
    );
}

#[test]
fn test_controller_without_credentials_fails() {
    let output = sgtpolicy_cmd()
        .args(["sgt", "list", "--controller", "https://dnac.example.com"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(text.contains("credentials"), "unexpected output:\n{text}");
}

#[test]
fn test_invalid_controller_url_is_a_usage_error() {
    let output = sgtpolicy_cmd()
        .args([
            "sgt",
            "list",
            "--controller",
            "not a url",
            "--username",
            "admin",
            "--password",
            "secret",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("Invalid value"), "unexpected output:\n{text}");
}

#[test]
fn test_invalid_auth_scheme_rejected() {
    let output = sgtpolicy_cmd()
        .args([
            "sgt",
            "list",
            "--controller",
            "https://dnac.example.com",
            "--username",
            "admin",
            "--password",
            "secret",
            "--auth-scheme",
            "kerberos",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
}

#[test]
fn test_sgt_delete_requires_name_or_tag() {
    let output = sgtpolicy_cmd()
        .args([
            "sgt",
            "delete",
            "--controller",
            "https://dnac.example.com",
            "--username",
            "admin",
            "--password",
            "secret",
            "--yes",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
}

#[test]
fn test_unknown_subcommand() {
    sgtpolicy_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ── Config commands (no controller needed) ──────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    sgtpolicy_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    sgtpolicy_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[defaults]")
                .and(predicate::str::contains("output = \"table\"")),
        );
}

#[test]
fn test_config_set_requires_controller_for_new_profile() {
    let output = sgtpolicy_cmd()
        .args(["config", "set", "lab", "--username", "admin"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("--controller"), "unexpected output:\n{text}");
}

#[test]
fn test_config_set_and_show_roundtrip() {
    let home = tempfile::tempdir().unwrap();

    let mut set = cargo_bin_cmd!("sgtpolicy");
    set.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args([
            "config",
            "set",
            "lab",
            "--controller",
            "https://dnac.lab.example.com",
            "--username",
            "admin",
            "--auth-scheme",
            "ticket",
        ])
        .assert()
        .success();

    let mut show = cargo_bin_cmd!("sgtpolicy");
    show.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.lab]")
                .and(predicate::str::contains("https://dnac.lab.example.com"))
                .and(predicate::str::contains("auth_scheme = \"ticket\"")),
        );
}
