#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("PERT_SCHEDULE_LOG")
        .write_stdin(script.to_string())
        .assert()
}

const DIAMOND: &str = "\
new\nname 1 A\nest 1 2 2 2
new\nname 2 B\nest 2 3 3 3\ndeps 2 A
new\nname 3 C\nest 3 1 1 1\ndeps 3 A
new\nname 4 D\nest 4 4 4 4\ndeps 4 B,C
";

#[test]
fn cli_computes_critical_path() {
    let script = format!("{DIAMOND}start 2025-01-06\ncompute\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains(
            "tasks=4, critical=3, duration=9, finish=2025-01-17, crit_path=1->2->4",
        ))
        .stdout(str_contains("Critical path: A -> B -> D"));
}

#[test]
fn cli_reports_missing_start_date() {
    run_cli("new\nname 1 A\nest 1 1 1 1\ncompute\nquit\n")
        .success()
        .stdout(str_contains("Not computable: set a project start date"));
}

#[test]
fn cli_reports_cycles() {
    run_cli("new\nname 1 A\nnew\nname 2 B\ndeps 1 B\ndeps 2 A\nstart 2025-01-06\ncompute\nquit\n")
        .success()
        .stdout(str_contains("circular dependency detected: A -> B -> A"));
}

#[test]
fn cli_shows_field_issues() {
    run_cli("new\nshow\nquit\n")
        .success()
        .stdout(str_contains("activity 1: name: activity name is required"));
}

#[test]
fn cli_pert_prints_probability_table() {
    let script = format!("{DIAMOND}start 2025-01-06\npert\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Expected duration: 9 days"))
        .stdout(str_contains("P95: 9.00 days"));
}

#[test]
fn cli_delete_then_purge() {
    let script = format!("{DIAMOND}start 2025-01-06\ndelete 3\ncompute\npurge 9\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Deleted activity 3."))
        .stdout(str_contains("depends on unknown activity 'C'"))
        .stdout(str_contains("Activity 9 not found."));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "new\nname 1 Persisted\nest 1 1 2 3\nsave json {path}\nnew\nname 2 Temp\nload json {path}\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Project saved to"));
    let after_reload = output
        .split("Project loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("Persisted"));
    assert!(
        !after_reload.contains("Temp"),
        "temporary activity should not appear after reload:\n{after_reload}"
    );
}
