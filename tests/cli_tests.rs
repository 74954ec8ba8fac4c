//! Integration tests for the command-line interface.
//!
//! These tests run the built binary against temporary config and report files.

use std::io::Write;
use std::process::Output;
use tempfile::{Builder, NamedTempFile};

/// Helper to get the binary path
fn binary_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_hostmon-dashboard"))
}

fn run(args: &[&str]) -> Output {
    std::process::Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Writes a two-host generation 1 history: "a" reported twice, "b" never.
fn reports_file() -> NamedTempFile {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
            "generation": 1,
            "hosts": ["b"],
            "reports": [
                ["100", "a", "4", "16384000", "0.1", "0.1", "0.1", "0", "1"],
                ["200", "a", "4", "16384000", "5.0", "3.0", "1.0", "12.5", "70"]
            ]
        }}"#
    )
    .unwrap();
    file
}

#[test]
fn test_check_config_default() {
    let output = run(&["--no-config", "--check-config"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Configuration is valid"));
}

#[test]
fn test_check_config_rejects_inverted_thresholds() {
    let mut config = Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(config, "thresholds:\n  pct_warning: 80.0\n  pct_critical: 50.0").unwrap();

    let output = run(&[
        "--config",
        config.path().to_str().unwrap(),
        "--check-config",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("pct_warning"),
        "Expected threshold error, got stderr: '{}'",
        stderr
    );
}

#[test]
fn test_show_config_lists_thresholds() {
    let output = run(&["--no-config", "--show-config"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("thresholds:"));
    assert!(stdout.contains("pct_critical: 66.0"));
    assert!(stdout.contains("load_warning_ratio: 0.5"));
}

#[test]
fn test_render_json() {
    let reports = reports_file();
    let output = run(&[
        "--no-config",
        "--reports",
        reports.path().to_str().unwrap(),
        "render",
        "--format",
        "json",
    ]);
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = snapshot["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["host"], "a");
    assert_eq!(rows[0]["timestamp"], 200);
    assert_eq!(rows[0]["load1"]["severity"], "critical");
    assert_eq!(rows[0]["load5"]["severity"], "warning");
    assert_eq!(rows[0]["load15"]["severity"], "normal");
    assert_eq!(rows[0]["swap_pct"]["severity"], "warning");
    assert_eq!(rows[0]["disk_pct"]["severity"], "critical");
    assert_eq!(snapshot["aggregate"]["total_hosts"], 1);
    assert_eq!(snapshot["aggregate"]["total_cores"], 4);
    assert_eq!(snapshot["aggregate"]["total_physmem_kb"], 16384000);
    assert_eq!(snapshot["hosts_listed"], 2);
}

#[test]
fn test_render_text_reports_missing_hosts() {
    let reports = reports_file();
    let output = run(&[
        "--no-config",
        "--reports",
        reports.path().to_str().unwrap(),
        "--report-missing-hosts",
        "render",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("1 total hosts, 4 total cores, 16384000 kB total physical memory"));
    assert!(stdout.contains("no reports: b"));
}

#[test]
fn test_render_flags_after_subcommand() {
    let reports = reports_file();
    let output = run(&[
        "--no-config",
        "render",
        "--reports",
        reports.path().to_str().unwrap(),
        "--generation",
        "1",
        "--report-missing-hosts",
        "--format",
        "json",
    ]);
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["generation"], 1);
    assert_eq!(snapshot["rows"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["missing"][0], "b");
}

#[test]
fn test_generate_testdata_accepts_generation_after_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports.json");
    let output = run(&[
        "--no-config",
        "generate-testdata",
        "-o",
        path.to_str().unwrap(),
        "--hosts",
        "2",
        "--generation",
        "1",
    ]);
    assert!(output.status.success());

    let fixture: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(fixture["generation"], 1);
}

#[test]
fn test_render_without_reports_file_fails() {
    let output = run(&["--no-config", "render"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("no reports file configured"),
        "Expected missing reports error, got stderr: '{}'",
        stderr
    );
}

#[test]
fn test_nonexistent_reports_file_is_invalid_config() {
    let output = run(&["--no-config", "--reports", "/nonexistent/reports.json", "check"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Reports file not found"));
}

#[test]
fn test_generation_out_of_range_rejected() {
    let output = run(&["--no-config", "--generation", "4", "--check-config"]);
    assert!(!output.status.success());
}

#[test]
fn test_generate_then_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports.json");
    let path_str = path.to_str().unwrap();

    let output = run(&[
        "--no-config",
        "--generation",
        "2",
        "generate-testdata",
        "-o",
        path_str,
        "--hosts",
        "3",
        "--reports-per-host",
        "2",
        "--silent-hosts",
        "1",
    ]);
    assert!(output.status.success());
    assert!(path.exists());

    let output = run(&[
        "--no-config",
        "--reports",
        path_str,
        "render",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["generation"], 2);
    assert_eq!(snapshot["rows"].as_array().unwrap().len(), 3);
    assert_eq!(snapshot["hosts_listed"], 4);
    assert_eq!(snapshot["aggregate"]["total_hosts"], 3);
}

#[test]
fn test_config_to_stdout() {
    let output = run(&["config", "-o", "-", "--commented"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("# Host Mon Dashboard Configuration"));
    assert!(stdout.contains("pct_warning: 10.0"));
}
