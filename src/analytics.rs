//! Analytics derivations.
//!
//! Pure aggregations over the task collection: status and priority
//! distributions with their fixed chart colors, per-project completion,
//! time totals, and the weekly productivity trend. Nothing here mutates
//! the collection; every function recomputes from scratch.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::calendar::{start_of_week, WeekStart};
use crate::project::ProjectCatalog;
use crate::task::{Priority, Task, TaskStatus};

/// Chart color for a status bucket.
pub fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Completed => "#10b981",
        TaskStatus::InProgress => "#f59e0b",
        TaskStatus::Pending => "#6b7280",
    }
}

/// Chart color for a priority bucket.
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#ef4444",
        Priority::Medium => "#f59e0b",
        Priority::Low => "#10b981",
    }
}

/// One labeled, colored bucket of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub name: String,
    pub count: usize,
    pub color: String,
}

/// Task counts per status, in display order: Completed, In Progress,
/// Pending.
pub fn status_distribution(tasks: &[Task]) -> Vec<DistributionSlice> {
    [
        TaskStatus::Completed,
        TaskStatus::InProgress,
        TaskStatus::Pending,
    ]
    .into_iter()
    .map(|status| DistributionSlice {
        name: status.display_name().to_string(),
        count: tasks.iter().filter(|task| task.status == status).count(),
        color: status_color(status).to_string(),
    })
    .collect()
}

/// Task counts per priority, in display order: High, Medium, Low.
pub fn priority_distribution(tasks: &[Task]) -> Vec<DistributionSlice> {
    Priority::ALL
        .into_iter()
        .map(|priority| DistributionSlice {
            name: priority.display_name().to_string(),
            count: tasks.iter().filter(|task| task.priority == priority).count(),
            color: priority_color(priority).to_string(),
        })
        .collect()
}

/// Completion summary for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectProgress {
    pub name: String,
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage; 0 for a project with no tasks.
    pub completion_rate: u32,
    pub color: String,
}

/// Per-project totals in catalog order.
pub fn project_progress(tasks: &[Task], catalog: &ProjectCatalog) -> Vec<ProjectProgress> {
    catalog
        .projects()
        .iter()
        .map(|project| {
            let total = tasks
                .iter()
                .filter(|task| task.project_id.as_deref() == Some(project.id.as_str()))
                .count();
            let completed = tasks
                .iter()
                .filter(|task| {
                    task.project_id.as_deref() == Some(project.id.as_str()) && task.is_completed()
                })
                .count();
            let completion_rate = if total > 0 {
                (100.0 * completed as f64 / total as f64).round() as u32
            } else {
                0
            };
            ProjectProgress {
                name: project.name.clone(),
                completed,
                total,
                completion_rate,
                color: project.color.clone(),
            }
        })
        .collect()
}

/// Sum of logged hours across every task.
pub fn total_time_spent(tasks: &[Task]) -> f64 {
    tasks.iter().map(Task::total_hours).sum()
}

/// Average logged hours per task; 0 when the collection is empty.
pub fn avg_time_per_task(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    total_time_spent(tasks) / tasks.len() as f64
}

/// Overall completion percentage; 0 when the collection is empty.
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|task| task.is_completed()).count();
    100.0 * completed as f64 / tasks.len() as f64
}

/// One day of the weekly productivity trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Short weekday label, e.g. "Sun".
    pub day: String,
    /// Hours logged across all entries dated that day.
    pub hours: f64,
    /// Tasks with at least one entry dated that day.
    pub tasks: usize,
}

/// Hours and active-task counts for each day of the week containing
/// `today`. Always exactly 7 points, in week order. Entries whose date
/// does not parse contribute nothing.
pub fn productivity_trend(
    tasks: &[Task],
    today: NaiveDate,
    week_start: WeekStart,
) -> Vec<TrendPoint> {
    let start = start_of_week(today, week_start);
    (0..7)
        .map(|offset| {
            let day = start + Duration::days(offset);
            let hours = tasks
                .iter()
                .flat_map(|task| task.time_entries.iter())
                .filter(|entry| entry.day() == Some(day))
                .map(|entry| entry.hours)
                .sum();
            let active_tasks = tasks
                .iter()
                .filter(|task| {
                    task.time_entries
                        .iter()
                        .any(|entry| entry.day() == Some(day))
                })
                .count();
            TrendPoint {
                day: day.format("%a").to_string(),
                hours,
                tasks: active_tasks,
            }
        })
        .collect()
}

/// Everything the analytics dashboard shows except the trend (which
/// additionally depends on the current date).
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_tasks: usize,
    pub completion_rate: f64,
    pub total_time_spent: f64,
    pub avg_time_per_task: f64,
    pub status_distribution: Vec<DistributionSlice>,
    pub priority_distribution: Vec<DistributionSlice>,
    pub project_progress: Vec<ProjectProgress>,
}

pub fn summarize(tasks: &[Task], catalog: &ProjectCatalog) -> AnalyticsSummary {
    AnalyticsSummary {
        total_tasks: tasks.len(),
        completion_rate: completion_rate(tasks),
        total_time_spent: total_time_spent(tasks),
        avg_time_per_task: avg_time_per_task(tasks),
        status_distribution: status_distribution(tasks),
        priority_distribution: priority_distribution(tasks),
        project_progress: project_progress(tasks, catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{sample_tasks, TimeEntry};
    use chrono::Utc;

    fn task(id: &str, status: TaskStatus, priority: Priority) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: None,
            priority,
            status,
            due_date: None,
            project_id: None,
            tags: Vec::new(),
            time_entries: Vec::new(),
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(id: &str, hours: f64, date: &str) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            hours,
            date: date.to_string(),
            description: None,
        }
    }

    #[test]
    fn status_distribution_counts_fixed_buckets() {
        let tasks = vec![
            task("a", TaskStatus::Completed, Priority::High),
            task("b", TaskStatus::Pending, Priority::Low),
            task("c", TaskStatus::Pending, Priority::Medium),
        ];

        let slices = status_distribution(&tasks);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].name, "Completed");
        assert_eq!(slices[0].count, 1);
        assert_eq!(slices[0].color, "#10b981");
        assert_eq!(slices[1].name, "In Progress");
        assert_eq!(slices[1].count, 0);
        assert_eq!(slices[2].name, "Pending");
        assert_eq!(slices[2].count, 2);
        assert_eq!(slices[2].color, "#6b7280");

        let rate = completion_rate(&tasks);
        assert!((rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn priority_distribution_orders_high_first() {
        let tasks = vec![
            task("a", TaskStatus::Pending, Priority::High),
            task("b", TaskStatus::Pending, Priority::High),
            task("c", TaskStatus::Pending, Priority::Low),
        ];

        let slices = priority_distribution(&tasks);
        assert_eq!(slices[0].name, "High");
        assert_eq!(slices[0].count, 2);
        assert_eq!(slices[0].color, "#ef4444");
        assert_eq!(slices[1].count, 0);
        assert_eq!(slices[2].name, "Low");
        assert_eq!(slices[2].count, 1);
    }

    #[test]
    fn project_progress_rounds_and_survives_empty_projects() {
        let catalog = ProjectCatalog::sample();
        let mut tasks = vec![
            task("a", TaskStatus::Completed, Priority::High),
            task("b", TaskStatus::Pending, Priority::Low),
            task("c", TaskStatus::Pending, Priority::Low),
        ];
        for item in &mut tasks {
            item.project_id = Some("proj-1".to_string());
        }

        let progress = project_progress(&tasks, &catalog);
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[0].name, "Website Redesign");
        assert_eq!(progress[0].total, 3);
        assert_eq!(progress[0].completed, 1);
        assert_eq!(progress[0].completion_rate, 33);

        // proj-2 and proj-3 have no tasks: rate 0, no division error.
        assert_eq!(progress[1].total, 0);
        assert_eq!(progress[1].completion_rate, 0);
    }

    #[test]
    fn time_totals_cover_sample_data() {
        let tasks = sample_tasks();
        assert_eq!(total_time_spent(&tasks), 15.0);
        assert_eq!(avg_time_per_task(&tasks), 3.0);
    }

    #[test]
    fn averages_are_zero_for_empty_collections() {
        assert_eq!(avg_time_per_task(&[]), 0.0);
        assert_eq!(total_time_spent(&[]), 0.0);
        assert_eq!(completion_rate(&[]), 0.0);
    }

    #[test]
    fn trend_produces_seven_labeled_points() {
        // Wednesday 2024-03-06; Sunday-start week runs 03-03 through 03-09.
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).expect("date");
        let mut logged = task("a", TaskStatus::InProgress, Priority::Medium);
        logged.time_entries = vec![
            entry("e1", 2.0, "2024-03-04"),
            entry("e2", 1.5, "2024-03-04"),
            entry("e3", 3.0, "2024-03-09"),
            entry("e4", 4.0, "2024-02-28"),
            entry("e5", 1.0, "garbage-date"),
        ];
        let mut other = task("b", TaskStatus::Pending, Priority::Low);
        other.time_entries = vec![entry("e6", 0.5, "2024-03-04")];
        let tasks = vec![logged, other];

        let trend = productivity_trend(&tasks, today, WeekStart::Sunday);
        assert_eq!(trend.len(), 7);
        let labels: Vec<&str> = trend.iter().map(|point| point.day.as_str()).collect();
        assert_eq!(labels, vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);

        // Monday 03-04: both tasks logged time.
        assert_eq!(trend[1].hours, 4.0);
        assert_eq!(trend[1].tasks, 2);
        // Saturday 03-09: one task.
        assert_eq!(trend[6].hours, 3.0);
        assert_eq!(trend[6].tasks, 1);
        // The out-of-week and unparseable entries contribute nowhere.
        let week_hours: f64 = trend.iter().map(|point| point.hours).sum();
        assert_eq!(week_hours, 7.5);
    }

    #[test]
    fn trend_honors_monday_week_start() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).expect("date");
        let trend = productivity_trend(&[], today, WeekStart::Monday);
        let labels: Vec<&str> = trend.iter().map(|point| point.day.as_str()).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert!(trend.iter().all(|point| point.hours == 0.0 && point.tasks == 0));
    }

    #[test]
    fn summarize_collects_everything() {
        let tasks = sample_tasks();
        let summary = summarize(&tasks, &ProjectCatalog::sample());
        assert_eq!(summary.total_tasks, 5);
        assert_eq!(summary.total_time_spent, 15.0);
        assert_eq!(summary.status_distribution[0].count, 2);
        assert_eq!(summary.project_progress.len(), 3);
        assert!((summary.completion_rate - 40.0).abs() < 1e-9);
    }
}
