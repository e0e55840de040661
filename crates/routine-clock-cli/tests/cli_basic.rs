//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points ROUTINE_CLOCK_HOME at its own temporary directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "routine-clock", "--"])
        .args(args)
        .env("ROUTINE_CLOCK_HOME", home)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_status_json() {
    let home = TempDir::new().unwrap();
    let out = run_ok(home.path(), &["status", "--at", "2026-10-14T10:00"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["mode"], "day");
    assert_eq!(parsed["bucket"], "mon_fri");
    assert_eq!(parsed["active_label"], "School");
    assert_eq!(parsed["minutes_left"], 315);
}

#[test]
fn test_status_weekend_night() {
    let home = TempDir::new().unwrap();
    let out = run_ok(home.path(), &["status", "--at", "2026-10-17T23:00"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["mode"], "night");
    assert_eq!(parsed["bucket"], "weekend");
    assert_eq!(parsed["active_label"], "Sleep");
}

#[test]
fn test_status_rejects_bad_time() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(home.path(), &["status", "--at", "noon"]);
    assert_ne!(code, 0);
}

#[test]
fn test_render_svg() {
    let home = TempDir::new().unwrap();
    let out = run_ok(home.path(), &["render", "--at", "2026-10-14T10:00"]);
    assert!(out.starts_with("<svg"));
    assert!(out.contains("day-mode"));
    assert!(out.contains("current-activity"));
    assert!(out.contains("Now: School"));
}

#[test]
fn test_render_to_file() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("dial.svg");
    let target_arg = target.to_string_lossy().to_string();
    run_ok(
        home.path(),
        &["render", "--at", "2026-10-14T22:00", "--out", &target_arg],
    );
    let svg = std::fs::read_to_string(&target).unwrap();
    assert!(svg.contains("night-mode"));
}

#[test]
fn test_schedule_set_list_reset() {
    let home = TempDir::new().unwrap();
    let exported = run_ok(home.path(), &["schedule", "list", "--json"]);
    let mut doc: serde_json::Value = serde_json::from_str(&exported).unwrap();
    doc["weekend"]["night"][0]["label"] = "Campfire".into();

    let file = home.path().join("edited.json");
    std::fs::write(&file, doc.to_string()).unwrap();
    let file_arg = file.to_string_lossy().to_string();
    run_ok(home.path(), &["schedule", "set", &file_arg]);

    let listed = run_ok(home.path(), &["schedule", "list"]);
    assert!(listed.contains("Campfire"));

    let reset = run_ok(home.path(), &["schedule", "reset"]);
    assert!(reset.contains("reset"));
    let listed = run_ok(home.path(), &["schedule", "list"]);
    assert!(!listed.contains("Campfire"));
}

#[test]
fn test_schedule_set_rejects_empty_label() {
    let home = TempDir::new().unwrap();
    let exported = run_ok(home.path(), &["schedule", "list", "--json"]);
    let mut doc: serde_json::Value = serde_json::from_str(&exported).unwrap();
    doc["mon_fri"]["day"][0]["label"] = "".into();

    let file = home.path().join("bad.json");
    std::fs::write(&file, doc.to_string()).unwrap();
    let file_arg = file.to_string_lossy().to_string();
    let (_, stderr, code) = run_cli(home.path(), &["schedule", "set", &file_arg]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "notifications.warning_minutes"]).trim(), "5");
    run_ok(home.path(), &["config", "set", "notifications.warning_minutes", "10"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "notifications.warning_minutes"]).trim(), "10");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "display.no_such_key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_list_shows_toml() {
    let home = TempDir::new().unwrap();
    run_ok(home.path(), &["config", "set", "display.svg_output", "/tmp/dial.svg"]);

    let listed = run_ok(home.path(), &["config", "list"]);
    assert!(listed.contains("[notifications]"));
    assert!(listed.contains("[display]"));
    assert!(listed.contains("svg_output = \"/tmp/dial.svg\""));

    let on_disk = std::fs::read_to_string(home.path().join("config.toml")).unwrap();
    assert_eq!(listed, on_disk);

    let json = run_ok(home.path(), &["config", "list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["notifications"]["warning_minutes"], 5);
}

#[test]
fn test_config_rejects_oversized_pulse() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) =
        run_cli(home.path(), &["config", "set", "notifications.pulse_secs", "100000000000000000"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("pulse_secs"));
    let out = run_ok(home.path(), &["status", "--at", "2026-10-14T10:00"]);
    assert!(out.contains("School"));
}

#[test]
fn test_run_with_fixed_clock() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("live.svg");
    let target_arg = target.to_string_lossy().to_string();
    let out = run_ok(
        home.path(),
        &[
            "run", "--silent", "--from", "2026-10-14T08:29:58", "--ticks", "4",
            "--interval-ms", "5", "--svg", &target_arg,
        ],
    );
    assert!(out.contains("Now: Leave School"));
    assert!(out.contains("Now: School"));
    assert!(std::fs::read_to_string(&target).unwrap().contains("Now: School"));
}

#[test]
fn test_status_falls_back_when_data_dir_unusable() {
    let home = TempDir::new().unwrap();
    let blocker = home.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let broken_home = blocker.join("sub");

    let out = run_ok(&broken_home, &["status", "--at", "2026-10-14T10:00"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["active_label"], "School");

    let svg = run_ok(&broken_home, &["render", "--at", "2026-10-14T10:00"]);
    assert!(svg.contains("Now: School"));
}
