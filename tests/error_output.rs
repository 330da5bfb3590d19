mod support;

use assert_cmd::Command;
use predicates::str::{contains, is_empty};
use serde_json::Value;

use support::TestWorkspace;

fn taskflow_cmd(ws: &TestWorkspace) -> Command {
    let mut cmd = support::taskflow_cmd();
    cmd.current_dir(ws.path());
    cmd
}

#[test]
fn json_errors_carry_kind_code_and_next_steps() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["task", "show", "task-99", "--json"])
        .assert()
        .failure()
        .code(3)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["schema_version"].as_str(), Some("taskflow.v1"));
    assert_eq!(value["command"].as_str(), Some("task show"));
    assert_eq!(value["status"].as_str(), Some("error"));
    assert_eq!(
        value["error"]["message"].as_str(),
        Some("Task not found: task-99")
    );
    assert_eq!(value["error"]["code"].as_i64(), Some(3));
    assert_eq!(value["error"]["kind"].as_str(), Some("not_found"));
    assert_eq!(value["next_steps"][0].as_str(), Some("taskflow task list"));

    Ok(())
}

#[test]
fn validation_errors_are_user_errors() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["task", "new", "  ", "--json"])
        .assert()
        .failure()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["error"]["kind"].as_str(), Some("user_error"));
    assert_eq!(
        value["error"]["message"].as_str(),
        Some("Please enter a task title")
    );
    assert_eq!(value["error"]["code"].as_i64(), Some(2));

    Ok(())
}

#[test]
fn human_errors_print_a_hint_line() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["time", "list", "task-99"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("error: Task not found: task-99"))
        .stderr(contains("hint: taskflow task list"));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let ws = TestWorkspace::init();
    let config = ws.write_file("broken.toml", b"[defaults]\npriority = \"urgent\"\n");

    taskflow_cmd(&ws)
        .args(["task", "list", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid configuration"))
        .stderr(contains("defaults.priority: invalid priority 'urgent'"))
        .stderr(contains("hint: fix .taskflow.toml then retry"));
}

#[test]
fn discovered_broken_config_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    // Discovery tolerates a broken file; only an explicit --config fails.
    ws.write_config("[defaults]\npriority = \"urgent\"\n");

    let output = taskflow_cmd(&ws)
        .args(["task", "new", "Keep going", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["priority"].as_str(), Some("medium"));

    Ok(())
}

#[test]
fn quiet_silences_success_output() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["task", "list", "--quiet"])
        .assert()
        .success()
        .stdout(is_empty());

    // JSON output is machine-facing and survives --quiet.
    taskflow_cmd(&ws)
        .args(["task", "list", "--quiet", "--json"])
        .assert()
        .success()
        .stdout(contains("\"schema_version\": \"taskflow.v1\""));
}

#[test]
fn missing_snapshot_file_is_an_operation_failure() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["task", "list", "--data", "nope.json"])
        .assert()
        .failure()
        .code(4)
        .stderr(contains("error: IO error"));
}
