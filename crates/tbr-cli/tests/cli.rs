//! End-to-end tests for the `tbr` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn tbr(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tbr").unwrap();
    cmd.current_dir(dir)
        .env_remove("TBR_CONFIG")
        .env_remove("TBR_RULE_FILE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--rule-file")
        .arg(rule_file(dir));
    cmd
}

fn rule_file(dir: &Path) -> PathBuf {
    dir.join("tls_bypass_rule.txt")
}

#[test]
fn test_init_creates_files() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path()).arg("init").assert().success();

    assert!(rule_file(temp_dir.path()).exists());
    assert!(temp_dir.path().join("burp_tls_autosync.txt").exists());
    assert!(temp_dir.path().join("backups").is_dir());
}

#[test]
fn test_add_then_list_json() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["add", "api.test.com", "--kind", "host"])
        .assert()
        .success();

    tbr(temp_dir.path())
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pattern\": \"api.test.com\""))
        .stdout(predicate::str::contains("\"type\": \"host\""));

    let content = std::fs::read_to_string(rule_file(temp_dir.path())).unwrap();
    assert!(content.contains("[BLOCK_HOSTS]\napi.test.com\n"));
}

#[test]
fn test_add_invalid_regex_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["add", "[invalid"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid pattern"));
}

#[test]
fn test_toggle_missing_rule_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["toggle", "absent.com"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Rule not found"));
}

#[test]
fn test_remove_missing_rule_reports() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["remove", "absent.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule not found"));
}

#[test]
fn test_export_json_to_stdout() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["add", r".*\.example\.com"])
        .assert()
        .success();

    tbr(temp_dir.path())
        .args(["export", "json", "-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"for_authorized_testing_only\": true"))
        .stdout(predicate::str::contains(r#""type": "regex""#));
}

#[test]
fn test_export_unknown_format_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["export", "xml", "-o", "-"])
        .assert()
        .failure();
}

#[test]
fn test_import_txt_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("import.txt");
    std::fs::write(&input, "[BLOCK_HOSTS]\nfoo.com\n#DISABLED bar.com\n[BLOCK_RULES]\n^x\n").unwrap();

    tbr(temp_dir.path())
        .args(["import", "txt"])
        .arg(&input)
        .assert()
        .success();

    tbr(temp_dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Host Rules: 1"))
        .stdout(predicate::str::contains("Total Regex Rules: 1"))
        .stdout(predicate::str::contains("Disabled Rules: 1"));
}

#[test]
fn test_import_burp_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("burp.txt");
    std::fs::write(&input, "foo.com\n").unwrap();

    tbr(temp_dir.path())
        .args(["import", "burp"])
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn test_pattern_test_command() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["test", r".*\.example\.com", "api.example.com", "example.org"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MATCH: api.example.com"))
        .stdout(predicate::str::contains("NO MATCH: example.org"));
}

#[test]
fn test_template_generate_and_add() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["template", "generate", "Match all subdomains", "example.com", "--add"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r".*\.example\.com"));

    let sync = std::fs::read_to_string(temp_dir.path().join("burp_tls_autosync.txt")).unwrap();
    assert!(sync.contains(".*\\.example\\.com\n"));
}

#[test]
fn test_conflicts_reported() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["add", r".*\.example\.com"])
        .assert()
        .success();
    tbr(temp_dir.path())
        .args(["add", "www.example.com", "--kind", "host"])
        .assert()
        .success();

    tbr(temp_dir.path())
        .args(["conflicts", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sample\": \"www.example.com\""));
}

#[test]
fn test_backups_restore_newest() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["add", "a.test.com", "--kind", "host"])
        .assert()
        .success();
    tbr(temp_dir.path())
        .args(["add", "b.test.com", "--kind", "host"])
        .assert()
        .success();

    tbr(temp_dir.path())
        .arg("backups")
        .assert()
        .success()
        .stdout(predicate::str::contains("   1. "));

    tbr(temp_dir.path())
        .args(["backups", "--restore", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));

    tbr(temp_dir.path())
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.test.com"))
        .stdout(predicate::str::contains("b.test.com").not());

    let sync = std::fs::read_to_string(temp_dir.path().join("burp_tls_autosync.txt")).unwrap();
    assert!(sync.contains("a.test.com"));
    assert!(!sync.contains("b.test.com"));
}

#[test]
fn test_backups_restore_out_of_range_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path()).arg("init").assert().success();

    tbr(temp_dir.path())
        .args(["backups", "--restore", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backup number 5"));
    tbr(temp_dir.path())
        .args(["backups", "--restore", "0"])
        .assert()
        .failure();
}

#[test]
fn test_reset_requires_confirmation() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["add", "keep.test.com", "--kind", "host"])
        .assert()
        .success();

    tbr(temp_dir.path()).arg("reset").assert().failure();
    tbr(temp_dir.path())
        .args(["list", "--json"])
        .assert()
        .stdout(predicate::str::contains("keep.test.com"));

    tbr(temp_dir.path()).args(["reset", "--yes"]).assert().success();
    tbr(temp_dir.path())
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keep.test.com").not());

    tbr(temp_dir.path())
        .args(["backups", "--restore", "1"])
        .assert()
        .success();
    tbr(temp_dir.path())
        .args(["list", "--json"])
        .assert()
        .stdout(predicate::str::contains("keep.test.com"));
}

#[test]
fn test_broken_local_config_can_be_regenerated() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("tbr.toml");
    std::fs::write(&config_path, "backup_retention = 0\n").unwrap();

    tbr(temp_dir.path()).arg("list").assert().failure();
    tbr(temp_dir.path())
        .args(["config", "validate", "tbr.toml"])
        .assert()
        .failure();
    tbr(temp_dir.path())
        .args(["config", "paths"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active configuration unavailable"));

    tbr(temp_dir.path())
        .args(["config", "generate", "--force"])
        .assert()
        .success();
    tbr(temp_dir.path())
        .args(["config", "validate", "tbr.toml"])
        .assert()
        .success();
    tbr(temp_dir.path()).arg("list").assert().success();
}

#[test]
fn test_compact_log_written_to_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("tbr.log");

    tbr(temp_dir.path())
        .args(["--log-format", "compact", "--log-file"])
        .arg(&log_path)
        .args(["-v", "init"])
        .assert()
        .success();

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("Created rule file"));
}

#[test]
fn test_completions_named_after_binary() {
    let temp_dir = tempfile::tempdir().unwrap();

    tbr(temp_dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tbr"));
}
