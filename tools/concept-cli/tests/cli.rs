use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::tempdir;

fn cli() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_st-concept-cli"));
    command
        .env_remove("SPIRAL_CONCEPT_FORMAT")
        .env_remove("SPIRAL_CONCEPT_PRECISION")
        .env_remove("SPIRAL_CONCEPT_NORMALISED")
        .env_remove("SPIRAL_TRACE_CHROME");
    command
}

fn run_cli(args: &[&str]) -> Output {
    cli().args(args).output().unwrap()
}

#[test]
fn evaluate_writes_json_report() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("report.json");

    let output = run_cli(&[
        "evaluate",
        "--concept",
        "Pet:0.8:0.3:#1f77b4",
        "--concept",
        "Fish:0.6:1.2",
        "--format",
        "json",
        "--output",
        output_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let report: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let concepts = report["concepts"].as_array().unwrap();
    assert_eq!(concepts.len(), 2);
    assert_eq!(concepts[0]["color"], "#1f77b4");
    assert!((concepts[0]["probability"].as_f64().unwrap() - 0.64).abs() < 1e-9);

    let re = 0.8 * 0.3f64.cos() + 0.6 * 1.2f64.cos();
    let im = 0.8 * 0.3f64.sin() + 0.6 * 1.2f64.sin();
    let composite = &report["composite"];
    assert!((composite["combined_probability"].as_f64().unwrap() - (re * re + im * im)).abs() < 1e-9);
    assert!((composite["combined_re"].as_f64().unwrap() - re).abs() < 1e-9);
    let interference = 2.0 * 0.8 * 0.6 * (0.3f64 - 1.2).cos();
    assert!((composite["interference"].as_f64().unwrap() - interference).abs() < 1e-9);
}

#[test]
fn evaluate_prints_text_table_with_shift() {
    let output = run_cli(&[
        "evaluate",
        "--concept",
        "Pet:1:0",
        "--concept",
        "Fish:1:0",
        "--shift",
        "1:pi",
        "--precision",
        "3",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("composite \"Pet Fish\""));
    assert!(stdout.contains("interference          -2.000 (destructive)"));
    assert!(stdout.contains("phase shift           member 1 by 3.142 rad"));
}

#[test]
fn evaluate_rejects_negative_magnitude() {
    let output = run_cli(&["evaluate", "--concept", "Pet:-1:0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("magnitude must be non-negative"));
}

#[test]
fn evaluate_rejects_duplicate_names() {
    let output = run_cli(&["evaluate", "--concept", "Pet:1:0", "--concept", "Pet:0.5:1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("already registered"));
}

#[test]
fn demo_reports_pet_fish() {
    let output = run_cli(&["demo", "--format", "json"]);
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["concepts"][0]["name"], "Pet");
    assert_eq!(report["concepts"][1]["name"], "Fish");
    let normalised = report["composite"]["normalised_probability"].as_f64().unwrap();
    let combined = 5.0 / 6.0 + 2.0 / 6f64.sqrt();
    assert!((normalised - combined / (combined + 5.0 / 6.0)).abs() < 1e-9);
}

#[test]
fn session_recovers_from_rejected_input() {
    let mut child = cli()
        .arg("session")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"set Pet 1 0\nset Fish 1 0\nmag Fish -1\nshow\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("error: magnitude must be non-negative (got -1)"));
    // the readout after the rejected edit is still the fully constructive one
    let last = stdout.rsplit("composite").next().unwrap();
    assert!(last.contains("combined probability  4.0000"));
}

#[test]
fn chrome_trace_is_complete_json_after_exit() {
    let dir = tempdir().unwrap();
    let trace_path = dir.path().join("trace.json");

    let output = cli()
        .env("SPIRAL_TRACE_CHROME", &trace_path)
        .env("RUST_LOG", "debug")
        .arg("demo")
        .output()
        .unwrap();
    assert!(output.status.success());

    let raw = fs::read_to_string(&trace_path).unwrap();
    let trace: Value = serde_json::from_str(&raw)
        .unwrap_or_else(|err| panic!("trace file is not valid JSON ({err}): {raw:?}"));
    let events = trace.as_array().expect("chrome trace is a JSON array");
    assert!(!events.is_empty(), "debug events should be recorded");
}
