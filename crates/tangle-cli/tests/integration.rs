//! Integration tests for the tangle CLI.
//!
//! These tests run the actual binary against the diagrams in `test_assets/`
//! and verify end-to-end behavior: report text, JSON shape and exit status.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tangle"))
}

/// Get the path to a file in the repo's test_assets directory.
fn asset(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // Go up from tangle-cli to crates
    path.pop(); // Go up from crates to repo root
    path.push("test_assets");
    path.push(name);
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn check(name: &str, extra: &[&str]) -> Output {
    let path = asset(name);
    let mut args = vec!["check", path.to_str().unwrap()];
    args.extend_from_slice(extra);
    run(&args)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn clean_diagram_passes() {
    let output = check("clean.svg", &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout:\n{stdout}");
    assert!(stdout.contains("DIAGRAM CROSSING DETECTION REPORT"));
    assert!(stdout.contains("Nodes found: 3"));
    assert!(stdout.contains("Paths found: 2"));
    assert!(stdout.contains("PASS - No crossing issues detected"));
}

#[test]
fn crossing_diagram_fails() {
    let output = check("crossing.svg", &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{stdout}");
    assert!(stdout.contains("-> Crosses: Review"));
    assert!(stdout.contains("FAIL - 4 errors, 0 warnings"));
}

#[test]
fn crossing_diagram_json() {
    let output = check("crossing.svg", &["--json"]);
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "fail");
    assert_eq!(json["nodes"], 3);
    assert_eq!(json["paths"], 3);
    assert_eq!(json["summary"]["errors"], 4);

    let issues = json["issues"].as_array().unwrap();
    let crossings: Vec<_> = issues
        .iter()
        .filter(|i| i["issue_type"] == "node_crossing")
        .collect();
    assert_eq!(crossings.len(), 1);
    assert_eq!(crossings[0]["node_name"], "Review");
    assert_eq!(crossings[0]["path_name"], "Source -> Sink (cuts through Review)");
    assert_eq!(crossings[0]["segment_index"], 1);

    let intersections = issues
        .iter()
        .filter(|i| i["issue_type"] == "path_intersection")
        .count();
    assert_eq!(intersections, 3);
}

#[test]
fn overlap_warns_but_passes() {
    let output = check("overlap.svg", &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout:\n{stdout}");
    assert!(stdout.contains("[segment_overlap] Horizontal segments overlap at y=80"));
    assert!(stdout.contains("WARNINGS - 1 warnings, no blocking errors"));
}

#[test]
fn overlapping_nodes_fail() {
    let output = check("stacked.svg", &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{stdout}");
    assert!(stdout.contains("[node_overlap] Plan"));
    assert!(stdout.contains("-> Overlaps: Build"));
    assert!(stdout.contains("FAIL - 1 errors, 0 warnings"));
}

#[test]
fn overlapping_nodes_json() {
    let output = check("stacked.svg", &["--json"]);
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    let issues = json["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["issue_type"], "node_overlap");
    assert_eq!(issues[0]["severity"], "error");
    assert_eq!(issues[0]["node_name"], "Plan");
    assert_eq!(issues[0]["other_node_name"], "Build");
    assert!(issues[0].get("path_name").is_none());
}

#[test]
fn fail_on_warnings_flag() {
    let output = check("overlap.svg", &["--fail-on-warnings"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn fail_on_warnings_from_config() {
    let config = asset("strict.yaml");
    let output = check("overlap.svg", &["--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn config_can_disable_a_pass() {
    let config = asset("no-overlaps.yaml");
    let output = check("overlap.svg", &["--json", "--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "pass");
    assert!(json["issues"].as_array().unwrap().is_empty());
}

#[test]
fn missing_config_is_an_error() {
    let output = check("clean.svg", &["--config", "/nonexistent/tangle.yaml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Missing configuration file"), "stderr:\n{stderr}");
}

#[test]
fn html_embedding_is_checked() {
    let output = check("embedded.html", &["--json"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["nodes"], 2);
    assert_eq!(json["paths"], 1);
    assert_eq!(json["verdict"], "pass");
}

#[test]
fn inventory_in_check_report() {
    let output = check("clean.svg", &["--inventory"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("NODE INVENTORY"));
    assert!(stdout.contains("PATH INVENTORY"));
    assert!(stdout.contains("Plan -> Build"));
}

#[test]
fn inventory_command_lists_nodes_and_paths() {
    let path = asset("clean.svg");
    let output = run(&["inventory", path.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    for name in ["Plan", "Build", "Ship", "Build -> Ship"] {
        assert!(stdout.contains(name), "missing {name} in:\n{stdout}");
    }
    assert!(stdout.contains("1. V-Seg(x=250, y:50-120)"));
}

#[test]
fn inventory_command_json() {
    let path = asset("clean.svg");
    let output = run(&["inventory", path.to_str().unwrap(), "--json"]);
    let json = stdout_json(&output);

    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["name"], "Plan");
    assert_eq!(nodes[0]["width"], 100.0);

    let paths = json["paths"].as_array().unwrap();
    assert_eq!(paths[0]["name"], "Plan -> Build");
    assert_eq!(paths[0]["raw_definition"], "M 100 25 L 200 25");
}

#[test]
fn reads_from_stdin() {
    let content = std::fs::read(asset("crossing.svg")).unwrap();

    let mut child = Command::new(binary_path())
        .args(["check", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child.stdin.take().unwrap().write_all(&content).unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["file"], "<stdin>");
}

#[test]
fn malformed_markup_exits_with_error() {
    let output = check("broken.svg", &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("XML parse error"), "stderr:\n{stderr}");
}

#[test]
fn missing_file_exits_with_error() {
    let output = run(&["check", "/nonexistent/diagram.svg"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_log_level_falls_back() {
    let output = check("clean.svg", &["--log-level", "chatty"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr.contains("Invalid log level: chatty"));
}
