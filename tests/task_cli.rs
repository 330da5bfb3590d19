mod support;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::{json, Value};

use support::TestWorkspace;

fn taskflow_cmd(ws: &TestWorkspace) -> Command {
    let mut cmd = support::taskflow_cmd();
    cmd.current_dir(ws.path());
    cmd
}

#[test]
fn new_task_starts_pending_with_default_priority() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["task", "new", "Write release notes", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["schema_version"].as_str(), Some("taskflow.v1"));
    assert_eq!(value["command"].as_str(), Some("task new"));
    assert_eq!(value["status"].as_str(), Some("success"));
    assert_eq!(value["data"]["status"].as_str(), Some("pending"));
    assert_eq!(value["data"]["priority"].as_str(), Some("medium"));

    let id = value["data"]["id"].as_str().expect("id");
    assert!(id.starts_with("tf-"), "unexpected id: {id}");

    Ok(())
}

#[test]
fn blank_title_is_rejected() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["task", "new", "   "])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Please enter a task title"));
}

#[test]
fn config_supplies_the_default_priority() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    ws.write_config("[defaults]\npriority = \"high\"\n");

    let output = taskflow_cmd(&ws)
        .args(["task", "new", "Triage incoming bugs", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["priority"].as_str(), Some("high"));

    Ok(())
}

#[test]
fn unknown_project_is_rejected() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["task", "new", "Orphan", "--project", "proj-9"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Project not found: proj-9"));
}

#[test]
fn list_filters_by_status_and_search() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["task", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["total"].as_u64(), Some(5));

    let output = taskflow_cmd(&ws)
        .args(["task", "list", "--status", "completed", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["total"].as_u64(), Some(2));
    assert_eq!(value["data"]["tasks"][0]["id"].as_str(), Some("task-1"));
    assert_eq!(value["data"]["tasks"][1]["id"].as_str(), Some("task-4"));

    let output = taskflow_cmd(&ws)
        .args(["task", "list", "--search", "DOCUMENTATION", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["total"].as_u64(), Some(1));
    assert_eq!(value["data"]["tasks"][0]["id"].as_str(), Some("task-3"));

    // Both predicates apply at once.
    let output = taskflow_cmd(&ws)
        .args([
            "task",
            "list",
            "--status",
            "completed",
            "--search",
            "documentation",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["total"].as_u64(), Some(0));

    Ok(())
}

#[test]
fn list_rejects_unknown_status_values() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["task", "list", "--status", "urgent"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown status filter 'urgent'"));
}

#[test]
fn show_resolves_project_and_hour_totals() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["task", "show", "task-1", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    let task = &value["data"]["task"];
    assert_eq!(task["title"].as_str(), Some("Design new landing page"));
    assert_eq!(task["project_name"].as_str(), Some("Website Redesign"));
    assert_eq!(task["total_hours"].as_f64(), Some(5.0));
    assert_eq!(task["time_entries"].as_array().map(Vec::len), Some(2));
    assert_eq!(task["tags"][0].as_str(), Some("design"));

    Ok(())
}

#[test]
fn show_unknown_task_exits_not_found() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["task", "show", "task-99"])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Task not found: task-99"))
        .stderr(contains("taskflow task list"));
}

#[test]
fn edit_patches_fields_and_clears_the_due_date() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args([
            "task",
            "edit",
            "task-3",
            "--title",
            "Refresh documentation",
            "--priority",
            "high",
            "--due",
            "",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    let task = &value["data"]["task"];
    assert_eq!(task["title"].as_str(), Some("Refresh documentation"));
    assert_eq!(task["priority"].as_str(), Some("high"));
    // Untouched fields survive the patch; the emptied due date is gone.
    assert_eq!(task["status"].as_str(), Some("pending"));
    assert!(task.get("due_date").is_none());

    Ok(())
}

#[test]
fn delete_requires_explicit_confirmation() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["task", "delete", "task-2", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["deleted"].as_bool(), Some(false));
    assert_eq!(
        value["next_steps"][0].as_str(),
        Some("taskflow task delete task-2 --yes")
    );

    taskflow_cmd(&ws)
        .args(["task", "delete", "task-2"])
        .assert()
        .success()
        .stdout(contains("Deletion cancelled"))
        .stdout(contains("Are you sure you want to delete this task?"));

    let output = taskflow_cmd(&ws)
        .args(["task", "delete", "task-2", "--yes", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["deleted"].as_bool(), Some(true));
    assert_eq!(value["data"]["id"].as_str(), Some("task-2"));

    taskflow_cmd(&ws)
        .args(["task", "delete", "task-99", "--yes"])
        .assert()
        .failure()
        .code(3);

    Ok(())
}

#[test]
fn toggle_flips_across_the_completed_boundary() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["task", "toggle", "task-1", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["status"].as_str(), Some("pending"));

    let output = taskflow_cmd(&ws)
        .args(["task", "toggle", "task-2", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["status"].as_str(), Some("completed"));

    taskflow_cmd(&ws)
        .args(["task", "toggle", "task-3"])
        .assert()
        .success()
        .stdout(contains("Task marked as completed"));

    Ok(())
}

#[test]
fn snapshot_seeds_the_session() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    let document = support::snapshot(json!([
        {
            "id": "task-registry",
            "title": "Registry cleanup",
            "status": "in-progress",
            "priority": "high",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }
    ]));
    let path = ws.write_snapshot("tasks.json", &document);

    let output = taskflow_cmd(&ws)
        .args(["task", "list", "--json", "--data"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["data"]["total"].as_u64(), Some(1));
    let task = &value["data"]["tasks"][0];
    assert_eq!(task["id"].as_str(), Some("task-registry"));
    assert_eq!(task["status"].as_str(), Some("in-progress"));
    // A snapshot without projects falls back to the sample catalog, and
    // a task outside it resolves to the placeholder label.
    assert_eq!(task["project_name"].as_str(), Some("No Project"));

    Ok(())
}

#[test]
fn snapshot_schema_is_enforced() {
    let ws = TestWorkspace::init();
    let document = json!({
        "schema_version": "taskflow.tasks.v2",
        "tasks": []
    });
    let path = ws.write_snapshot("future.json", &document);

    taskflow_cmd(&ws)
        .args(["task", "list", "--data"])
        .arg(&path)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unsupported snapshot schema 'taskflow.tasks.v2'"));
}

#[test]
fn human_list_output_reads_like_a_report() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(contains("Tasks"))
        .stdout(contains("- Total: 5"))
        .stdout(contains(
            "[completed][high] task-1 Design new landing page (project: Website Redesign)",
        ));
}
