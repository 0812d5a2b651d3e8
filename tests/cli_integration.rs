//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end against an isolated data
//! directory.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Get the binary to test, pointed at an isolated data directory.
fn modkit(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("modkit").unwrap();
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

/// Write a plugin manifest fixture under the data directory.
fn install_plugin(data_dir: &TempDir, slug: &str, entry: &str, enabled: bool) {
    let manifest = format!(
        r#"{{
    "name": "Plugin {slug}",
    "slug": "{slug}",
    "version": "1.0.0",
    "author": "tests",
    "description": "integration fixture",
    "entry": "{entry}",
    "enabled": {enabled}
}}"#
    );
    data_dir.child(format!("plugins/{slug}/plugin.json")).write_str(&manifest).unwrap();
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    Command::cargo_bin("modkit")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plugins"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("modkit")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand_fails() {
    Command::cargo_bin("modkit").unwrap().assert().failure();
}

// ============================================================================
// List Command Tests
// ============================================================================

#[test]
fn test_list_empty() {
    let temp = TempDir::new().unwrap();
    modkit(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plugins installed"));
}

#[test]
fn test_list_shows_enabled_plugin_with_commands() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "hello-world", "builtin:hello", true);

    modkit(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-world"))
        .stdout(predicate::str::contains("[enabled]"))
        .stdout(predicate::str::contains("Commands: greet"));
}

#[test]
fn test_list_shows_disabled_plugin() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "fileinfo", "builtin:fileinfo", false);

    modkit(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[disabled]"));
}

#[test]
fn test_list_tolerates_malformed_manifest() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "hello-world", "builtin:hello", true);
    // Manifest missing the required `entry` field.
    temp.child("plugins/broken/plugin.json")
        .write_str(r#"{"name": "Broken", "slug": "broken", "version": "0.1.0"}"#)
        .unwrap();

    modkit(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-world"))
        .stdout(predicate::str::contains("broken").not());
}

// ============================================================================
// Enable / Disable / Run Tests
// ============================================================================

#[test]
fn test_run_loaded_plugin_command() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "hello-world", "builtin:hello", true);

    modkit(&temp)
        .args(["run", "hello-world", "greet", "integration"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello, integration!"));
}

#[test]
fn test_run_disabled_plugin_fails() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "fileinfo", "builtin:fileinfo", false);

    modkit(&temp)
        .args(["run", "fileinfo", "stat", "somewhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not loaded"));
}

#[test]
fn test_run_unknown_command_fails() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "hello-world", "builtin:hello", true);

    modkit(&temp)
        .args(["run", "hello-world", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no command"));
}

#[test]
fn test_enable_then_run() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "fileinfo", "builtin:fileinfo", false);

    modkit(&temp)
        .args(["enable", "fileinfo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled"));

    // Enable persisted: a fresh invocation sees the plugin loaded.
    modkit(&temp).args(["run", "fileinfo", "stat", "nope.xml"]).assert().success();
}

#[test]
fn test_disable_persists_across_invocations() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "hello-world", "builtin:hello", true);

    modkit(&temp).args(["disable", "hello-world"]).assert().success();

    modkit(&temp).args(["run", "hello-world", "greet"]).assert().failure();

    modkit(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[disabled]"));
}

#[test]
fn test_enable_unknown_plugin_fails() {
    let temp = TempDir::new().unwrap();

    modkit(&temp)
        .args(["enable", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown plugin"));
}

// ============================================================================
// Update Command Tests (offline paths only)
// ============================================================================

#[test]
fn test_update_check_offline_without_cache_fails() {
    let temp = TempDir::new().unwrap();

    modkit(&temp)
        .args(["update", "check", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog"));
}

#[test]
fn test_update_check_offline_with_cached_catalog() {
    let temp = TempDir::new().unwrap();
    install_plugin(&temp, "hello-world", "builtin:hello", true);

    temp.child("catalog.json")
        .write_str(
            r#"{
                "core": {"version": "0.0.1"},
                "plugins": [
                    {"slug": "hello-world", "version": "1.5.0"},
                    {"slug": "brand-new", "version": "0.1.0"}
                ]
            }"#,
        )
        .unwrap();

    modkit(&temp)
        .args(["update", "check", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-world: 1.0.0 -> 1.5.0"))
        .stdout(predicate::str::contains("brand-new: 0.1.0 (new)"));
}

#[test]
fn test_update_check_offline_up_to_date() {
    let temp = TempDir::new().unwrap();
    temp.child("catalog.json")
        .write_str(r#"{"core": {"version": "0.0.1"}, "plugins": []}"#)
        .unwrap();

    modkit(&temp)
        .args(["update", "check", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn test_update_apply_without_catalog_fails_with_hint() {
    let temp = TempDir::new().unwrap();

    modkit(&temp)
        .args(["update", "apply"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("update check"));
}

#[test]
fn test_update_apply_nothing_to_do() {
    let temp = TempDir::new().unwrap();
    temp.child("catalog.json")
        .write_str(r#"{"core": {"version": "0.0.1"}, "plugins": []}"#)
        .unwrap();

    modkit(&temp)
        .args(["update", "apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to update"));
}
