mod fixtures;

use std::fs;
use std::process::{Command, Output};

use fixtures::get_test_fixture_path;
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_toolkit-assist"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute toolkit-assist")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Step Functions authoring helpers"));
    assert!(stdout.contains("assets"));
    assert!(stdout.contains("roles"));
    assert!(stdout.contains("validate"));
}

#[test]
fn test_cli_missing_subcommand() {
    let output = run(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_roles_lists_step_functions_roles() {
    let path = get_test_fixture_path("roles", Some("list_roles.json"));
    let output = run(&["roles", path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "StepFunctions-HelloWorld-role\tarn:aws:iam::123456789012:role/service-role/StepFunctions-HelloWorld-role",
            "shared-workflow-role\tarn:aws:iam::123456789012:role/shared-workflow-role",
        ]
    );
}

#[test]
fn test_cli_verbose_logs_stay_off_stdout() {
    let path = get_test_fixture_path("roles", Some("list_roles.json"));
    let output = run(&["roles", path.to_str().unwrap(), "-v"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("inspected roles"));
    assert!(!stdout(&output).contains("inspected roles"));
    assert_eq!(stdout(&output).lines().count(), 2);
}

#[test]
fn test_cli_roles_accepts_aws_cli_output() {
    let path = get_test_fixture_path("roles", Some("list_roles_cli.json"));
    let output = run(&["roles", path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let names: Vec<String> = stdout(&output)
        .lines()
        .filter_map(|line| line.split('\t').next())
        .map(str::to_string)
        .collect();
    assert_eq!(names, vec!["StepFunctions-OrderFlow-role", "events-and-states-role"]);
}

#[test]
fn test_cli_roles_rejects_malformed_trust_policy() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("roles.json");
    fs::write(
        &path,
        r#"{"Roles": [{"RoleName": "broken", "Arn": "arn:aws:iam::1:role/broken", "AssumeRolePolicyDocument": "{"}]}"#,
    )
    .unwrap();

    let output = run(&["roles", path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("broken"));
}

#[test]
fn test_cli_validate_valid_definition() {
    let path = get_test_fixture_path("asl", Some("first_match.asl.json"));
    let output = run(&["validate", path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("valid"));
}

#[test]
fn test_cli_validate_yaml_detected_from_extension() {
    let path = get_test_fixture_path("asl", Some("fan_out.asl.yaml"));
    let output = run(&["validate", path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_cli_validate_invalid_definition() {
    let path = get_test_fixture_path("asl", Some("missing_start_state.asl.json"));
    let output = run(&["validate", path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("/StartAt"));
    assert!(stderr(&output).contains("not a valid state machine definition"));
}

#[test]
fn test_cli_validate_forced_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("machine.asl");
    fs::write(
        &path,
        "StartAt: Done\nStates:\n  Done:\n    Type: Succeed\n",
    )
    .unwrap();

    let output = run(&["validate", path.to_str().unwrap(), "--format", "yaml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run(&["validate", path.to_str().unwrap(), "--format", "json"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_missing_file() {
    let output = run(&["validate", "/nonexistent/path/machine.asl.json"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_cli_assets_check_reports_empty_cache() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    let cache_dir = temp_dir.path().join("cache");
    fs::write(
        &config_path,
        format!(r#"{{"cache_dir": {:?}}}"#, cache_dir.to_str().unwrap()),
    )
    .unwrap();

    let output = run(&["assets", "check", "--config", config_path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not cached"));
}
