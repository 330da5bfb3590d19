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

/// Three tasks in one project, one completed, with hours logged across
/// the week of 2025-03-09. Fixed dates keep the trend assertions stable.
fn trend_snapshot() -> Value {
    json!({
        "schema_version": support::SNAPSHOT_SCHEMA,
        "tasks": [
            {
                "id": "task-a",
                "title": "Draft proposal",
                "status": "completed",
                "priority": "high",
                "project_id": "proj-a",
                "time_entries": [
                    { "id": "entry-a1", "hours": 2.0, "date": "2025-03-10" },
                    { "id": "entry-a2", "hours": 1.5, "date": "2025-03-12" }
                ],
                "created_at": "2025-03-01T10:00:00Z",
                "updated_at": "2025-03-12T10:00:00Z"
            },
            {
                "id": "task-b",
                "title": "Review proposal",
                "status": "in-progress",
                "priority": "medium",
                "project_id": "proj-a",
                "time_entries": [
                    { "id": "entry-b1", "hours": 3.0, "date": "2025-03-10" }
                ],
                "created_at": "2025-03-01T10:00:00Z",
                "updated_at": "2025-03-10T10:00:00Z"
            },
            {
                "id": "task-c",
                "title": "File paperwork",
                "status": "pending",
                "priority": "low",
                "project_id": "proj-a",
                "created_at": "2025-03-01T10:00:00Z",
                "updated_at": "2025-03-01T10:00:00Z"
            }
        ],
        "projects": [
            { "id": "proj-a", "name": "Apollo", "color": "#6366f1" }
        ]
    })
}

#[test]
fn summary_aggregates_the_sample_collection() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();

    let output = taskflow_cmd(&ws)
        .args(["analytics", "summary", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    let data = &value["data"];
    assert_eq!(data["total_tasks"].as_u64(), Some(5));
    assert_eq!(data["completion_rate"].as_f64(), Some(40.0));
    assert_eq!(data["total_time_spent"].as_f64(), Some(15.0));
    assert_eq!(data["avg_time_per_task"].as_f64(), Some(3.0));

    // Fixed bucket order with fixed chart colors.
    let statuses = data["status_distribution"].as_array().expect("statuses");
    assert_eq!(statuses[0]["name"].as_str(), Some("Completed"));
    assert_eq!(statuses[0]["count"].as_u64(), Some(2));
    assert_eq!(statuses[0]["color"].as_str(), Some("#10b981"));
    assert_eq!(statuses[1]["name"].as_str(), Some("In Progress"));
    assert_eq!(statuses[1]["color"].as_str(), Some("#f59e0b"));
    assert_eq!(statuses[2]["name"].as_str(), Some("Pending"));
    assert_eq!(statuses[2]["color"].as_str(), Some("#6b7280"));

    let priorities = data["priority_distribution"].as_array().expect("priorities");
    assert_eq!(priorities[0]["name"].as_str(), Some("High"));
    assert_eq!(priorities[0]["count"].as_u64(), Some(2));
    assert_eq!(priorities[0]["color"].as_str(), Some("#ef4444"));
    assert_eq!(priorities[2]["name"].as_str(), Some("Low"));
    assert_eq!(priorities[2]["count"].as_u64(), Some(2));

    let progress = data["project_progress"].as_array().expect("progress");
    assert_eq!(progress.len(), 3);
    assert_eq!(progress[0]["name"].as_str(), Some("Website Redesign"));
    assert_eq!(progress[0]["completed"].as_u64(), Some(1));
    assert_eq!(progress[0]["total"].as_u64(), Some(2));
    assert_eq!(progress[0]["completion_rate"].as_u64(), Some(50));

    Ok(())
}

#[test]
fn summary_keeps_raw_and_rounded_rates_apart() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    let path = ws.write_snapshot("tasks.json", &trend_snapshot());

    let output = taskflow_cmd(&ws)
        .args(["analytics", "summary", "--json", "--data"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    // One of three complete: the overall rate stays fractional while the
    // per-project rate is rounded to a whole percent.
    let rate = value["data"]["completion_rate"].as_f64().expect("rate");
    assert!((rate - 100.0 / 3.0).abs() < 1e-9);
    let progress = &value["data"]["project_progress"][0];
    assert_eq!(progress["name"].as_str(), Some("Apollo"));
    assert_eq!(progress["completion_rate"].as_u64(), Some(33));
    assert_eq!(progress["color"].as_str(), Some("#6366f1"));

    Ok(())
}

#[test]
fn trend_covers_the_week_containing_the_anchor() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    let path = ws.write_snapshot("tasks.json", &trend_snapshot());

    let output = taskflow_cmd(&ws)
        .args(["analytics", "trend", "--date", "2025-03-12", "--json", "--data"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["command"].as_str(), Some("analytics trend"));
    assert_eq!(value["data"]["week_start"].as_str(), Some("sunday"));
    assert_eq!(value["data"]["week_of"].as_str(), Some("2025-03-09"));

    let days = value["data"]["days"].as_array().expect("days");
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["day"].as_str(), Some("Sun"));
    // Monday: both tasks logged time.
    assert_eq!(days[1]["day"].as_str(), Some("Mon"));
    assert_eq!(days[1]["hours"].as_f64(), Some(5.0));
    assert_eq!(days[1]["tasks"].as_u64(), Some(2));
    // Wednesday: one task.
    assert_eq!(days[3]["hours"].as_f64(), Some(1.5));
    assert_eq!(days[3]["tasks"].as_u64(), Some(1));
    // Quiet days report zeros rather than disappearing.
    assert_eq!(days[6]["hours"].as_f64(), Some(0.0));
    assert_eq!(days[6]["tasks"].as_u64(), Some(0));

    Ok(())
}

#[test]
fn trend_honors_the_configured_week_start() -> Result<(), Box<dyn std::error::Error>> {
    let ws = TestWorkspace::init();
    ws.write_config("[calendar]\nweek_start = \"monday\"\n");
    let path = ws.write_snapshot("tasks.json", &trend_snapshot());

    let output = taskflow_cmd(&ws)
        .args(["analytics", "trend", "--date", "2025-03-12", "--json", "--data"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;

    assert_eq!(value["data"]["week_start"].as_str(), Some("monday"));
    assert_eq!(value["data"]["week_of"].as_str(), Some("2025-03-10"));
    let days = value["data"]["days"].as_array().expect("days");
    assert_eq!(days[0]["day"].as_str(), Some("Mon"));
    assert_eq!(days[0]["hours"].as_f64(), Some(5.0));

    Ok(())
}

#[test]
fn trend_rejects_bad_anchor_dates() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["analytics", "trend", "--date", "not-a-date"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid date 'not-a-date'"));
}

#[test]
fn human_summary_reads_like_a_report() {
    let ws = TestWorkspace::init();

    taskflow_cmd(&ws)
        .args(["analytics", "summary"])
        .assert()
        .success()
        .stdout(contains("Analytics"))
        .stdout(contains("- Completion rate: 40.0%"))
        .stdout(contains("- Total time: 15h"))
        .stdout(contains("Project Website Redesign: 1/2 (50%)"));
}
