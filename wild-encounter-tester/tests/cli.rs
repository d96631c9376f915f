use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "wild-encounter-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_wild-encounter-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("fishing-window"));
}

#[test]
fn cli_json_report_has_one_entry_per_run() {
    let exe = env!("CARGO_BIN_EXE_wild-encounter-tester");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--scenarios",
            "land,rock-smash",
            "--seeds",
            "1,2",
            "--attempts",
            "60",
            "--lead",
            "static",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let runs: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let runs = runs.as_array().expect("array of runs");
    assert_eq!(runs.len(), 4);
    assert!(runs.iter().all(|run| run["passed"] == true));
    assert!(
        runs.iter()
            .filter(|run| run["scenario"] == "rock-smash")
            .all(|run| run["encounters"] == 60)
    );
}

#[test]
fn cli_rejects_unknown_scenarios() {
    let exe = env!("CARGO_BIN_EXE_wild-encounter-tester");
    let output = Command::new(exe)
        .args(["--scenarios", "surfing"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown scenario"));
}

#[test]
fn cli_reports_missing_asset_directory() {
    let exe = env!("CARGO_BIN_EXE_wild-encounter-tester");
    let output = Command::new(exe)
        .args(["--assets", "/definitely/not/here", "--attempts", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load assets"));
}
