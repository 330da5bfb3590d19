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

fn due_task(id: &str, title: &str, due: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "due_date": due,
        "created_at": "2025-03-01T10:00:00Z",
        "updated_at": "2025-03-01T10:00:00Z"
    })
}

#[test]
fn month_grid_spans_whole_weeks() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    let document = support::snapshot(json!([due_task(
        "task-due",
        "Renew certificates",
        "2025-03-15"
    )]));
    let path = ws.write_snapshot("tasks.json", &document);

    let output = taskflow_cmd(&ws)
        .args(["calendar", "month", "--date", "2025-03-15", "--json", "--data"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["data"]["month"].as_str(), Some("March 2025"));
    assert_eq!(value["data"]["week_start"].as_str(), Some("sunday"));

    // March 2025 starts on a Saturday, so the grid picks up six days of
    // February and runs through the first Saturday of April.
    let days = value["data"]["days"].as_array().expect("days");
    assert_eq!(days.len(), 42);
    assert_eq!(days[0]["date"].as_str(), Some("2025-02-23"));
    assert_eq!(days[0]["in_month"].as_bool(), Some(false));
    assert_eq!(days[41]["date"].as_str(), Some("2025-04-05"));

    let cell = days
        .iter()
        .find(|cell| cell["date"].as_str() == Some("2025-03-15"))
        .expect("due cell");
    assert_eq!(cell["in_month"].as_bool(), Some(true));
    assert_eq!(cell["tasks"][0]["id"].as_str(), Some("task-due"));
    assert_eq!(cell["tasks"][0]["status"].as_str(), Some("pending"));

    // Empty cells carry no task array at all.
    assert!(days[0].get("tasks").is_none());

    Ok(())
}

#[test]
fn monday_start_shifts_the_grid() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    ws.write_config("[calendar]\nweek_start = \"monday\"\n");
    let document = support::snapshot(json!([]));
    let path = ws.write_snapshot("tasks.json", &document);

    let output = taskflow_cmd(&ws)
        .args(["calendar", "month", "--date", "2025-03-15", "--json", "--data"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["data"]["week_start"].as_str(), Some("monday"));
    let days = value["data"]["days"].as_array().expect("days");
    assert_eq!(days.len(), 42);
    assert_eq!(days[0]["date"].as_str(), Some("2025-02-24"));
    assert_eq!(days[41]["date"].as_str(), Some("2025-04-06"));

    Ok(())
}

#[test]
fn human_output_truncates_crowded_days() {
    let ws = TestWorkspace::init();
    let document = support::snapshot(json!([
        due_task("task-d1", "Stand-up notes", "2025-03-15"),
        due_task("task-d2", "Quarterly review", "2025-03-15"),
        due_task("task-d3", "Expense report", "2025-03-15"),
        due_task("task-d4", "Backup audit", "2025-03-15"),
    ]));
    let path = ws.write_snapshot("tasks.json", &document);

    taskflow_cmd(&ws)
        .args(["calendar", "month", "--date", "2025-03-15", "--data"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("March 2025"))
        .stdout(contains("- Tasks due: 4"))
        .stdout(contains("Expense report, +1 more"));
}

#[test]
fn display_limit_is_configurable() {
    let ws = TestWorkspace::init();
    ws.write_config("[calendar]\nday_display_limit = 1\n");
    let document = support::snapshot(json!([
        due_task("task-d1", "Stand-up notes", "2025-03-15"),
        due_task("task-d2", "Quarterly review", "2025-03-15"),
    ]));
    let path = ws.write_snapshot("tasks.json", &document);

    taskflow_cmd(&ws)
        .args(["calendar", "month", "--date", "2025-03-15", "--data"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Stand-up notes, +1 more"));
}

#[test]
fn month_rejects_bad_anchor_dates() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["calendar", "month", "--date", "2025-13-01"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid date '2025-13-01'"));
}
