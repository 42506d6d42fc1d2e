//! CLI tests for the `hl7 explain` subcommand.

use std::process::Command;

use assert_cmd::cargo;

fn hl7_cmd() -> Command {
    Command::new(cargo::cargo_bin!("hl7"))
}

#[test]
fn explain_known_code_json_returns_explanation() {
    let output = hl7_cmd()
        .args(["explain", "HL7-1101", "--output", "json"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["id"], "HL7-1101");
    assert!(json["explanation"].is_string());
}

#[test]
fn explain_unknown_code_json_returns_null_explanation() {
    let output = hl7_cmd()
        .args(["explain", "HL7-9999", "--output", "json"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["id"], "HL7-9999");
    assert!(json["explanation"].is_null());
}

#[test]
fn explain_pretty_shows_human_readable_text() {
    let output = hl7_cmd()
        .args(["explain", "HL7-1002", "--output", "pretty"])
        .output()
        .expect("run explain command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("HL7-1002") && stdout.contains("MSH"),
        "unexpected output: {stdout}"
    );
}
