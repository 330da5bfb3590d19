//! Task management for taskflow.
//!
//! The task collection lives entirely in memory. Every surface (CLI
//! invocation, TUI session) seeds a store from sample data or a snapshot
//! document, mutates it through the operations here, and discards it on
//! exit. Nothing is persisted.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

use crate::attachment::Attachment;
use crate::error::{Error, Result};
use crate::project::Project;

const TASK_ID_PREFIX: &str = "tf";
const SNAPSHOT_SCHEMA_VERSION: &str = "taskflow.tasks.v1";

/// Canonical calendar-date format for due dates and time-entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Capitalized form for charts and summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// The status toggle rule: completed drops back to pending, anything
    /// else jumps to completed.
    pub fn toggled(&self) -> TaskStatus {
        match self {
            TaskStatus::Completed => TaskStatus::Pending,
            _ => TaskStatus::Completed,
        }
    }

    pub fn parse(value: &str) -> Result<TaskStatus> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "unknown task status '{value}' (expected pending|in-progress|completed)"
            ))),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Chart order: most urgent first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(value: &str) -> Result<Priority> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidArgument(format!(
                "unknown priority '{value}' (expected low|medium|high)"
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id: String,
    pub hours: f64,
    /// Raw calendar date string as entered; parsed at use sites.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimeEntry {
    /// The entry's calendar day, if the date string parses.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_entries: Vec<TimeEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// The task's due day, if the raw due-date string parses. Invalid
    /// values yield None and are silently excluded from date-keyed views.
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_calendar_date)
    }

    /// Sum of logged hours; 0 for a task with no entries.
    pub fn total_hours(&self) -> f64 {
        self.time_entries.iter().map(|entry| entry.hours).sum()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Input for creating a task (and, via full forms, for editing one).
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub project_id: Option<String>,
    /// Raw comma-separated tag input; normalized on create/update.
    pub tags: Option<String>,
}

/// Partial update for a task. None fields are left untouched; empty
/// strings clear the optional fields they target.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub project_id: Option<String>,
    pub tags: Option<String>,
}

/// Input for adding or replacing a time entry.
#[derive(Debug, Clone)]
pub struct TimeEntryDraft {
    pub hours: f64,
    pub date: String,
    pub description: Option<String>,
}

/// Split comma-separated tag input, trimming entries and discarding
/// empty ones.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strict hours parsing: text in, validated positive number out. Never a
/// silent coercion.
pub fn parse_hours(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Please enter valid hours".to_string()));
    }
    let hours: f64 = trimmed
        .parse()
        .map_err(|_| Error::Validation("Please enter valid hours".to_string()))?;
    validate_hours(hours)?;
    Ok(hours)
}

/// Parse a calendar date string; None for anything that is not a real
/// date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn validate_hours(hours: f64) -> Result<()> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(Error::Validation(
            "Hours must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_entry_date(date: &str) -> Result<String> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Please select a date".to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Please enter a task title".to_string()));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

/// In-memory task collection. Operations either complete fully or leave
/// the collection untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// A store seeded with the built-in sample tasks.
    pub fn with_sample_data() -> Self {
        Self::from_tasks(sample_tasks())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn get(&self, task_id: &str) -> Result<&Task> {
        self.find(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    fn position(&self, task_id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    pub fn generate_task_id(&self) -> String {
        loop {
            let id = format!(
                "{}-{}",
                TASK_ID_PREFIX,
                Ulid::new().to_string().to_ascii_lowercase()
            );
            if self.find(&id).is_none() {
                return id;
            }
        }
    }

    /// Create a task from a draft. New tasks always start pending with
    /// empty time entries and attachments.
    pub fn create(&mut self, draft: TaskDraft) -> Result<&Task> {
        let title = validate_title(&draft.title)?;
        let now = Utc::now();
        let task = Task {
            id: self.generate_task_id(),
            title,
            description: normalize_optional(draft.description),
            priority: draft.priority.unwrap_or_default(),
            status: TaskStatus::Pending,
            due_date: normalize_optional(draft.due_date),
            project_id: normalize_optional(draft.project_id),
            tags: draft.tags.as_deref().map(parse_tags).unwrap_or_default(),
            time_entries: Vec::new(),
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Apply a patch to an existing task. Identity, status, creation time,
    /// time entries, and attachments are preserved; `updated_at` is
    /// refreshed.
    pub fn update(&mut self, task_id: &str, patch: TaskPatch) -> Result<&Task> {
        let index = self.position(task_id)?;
        let title = match patch.title {
            Some(title) => Some(validate_title(&title)?),
            None => None,
        };

        let task = &mut self.tasks[index];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = normalize_optional(Some(description));
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = normalize_optional(Some(due_date));
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = normalize_optional(Some(project_id));
        }
        if let Some(tags) = patch.tags {
            task.tags = parse_tags(&tags);
        }
        task.updated_at = Utc::now();
        Ok(&self.tasks[index])
    }

    /// Remove a task, cascading to its time entries and attachments (both
    /// are owned by the task record). Returns the removed task.
    pub fn delete(&mut self, task_id: &str) -> Result<Task> {
        let index = self.position(task_id)?;
        Ok(self.tasks.remove(index))
    }

    /// Flip the task across the completed boundary and report the new
    /// status.
    pub fn toggle_status(&mut self, task_id: &str) -> Result<TaskStatus> {
        let index = self.position(task_id)?;
        let task = &mut self.tasks[index];
        task.status = task.status.toggled();
        task.updated_at = Utc::now();
        Ok(task.status)
    }

    pub fn add_time_entry(&mut self, task_id: &str, draft: TimeEntryDraft) -> Result<&TimeEntry> {
        let index = self.position(task_id)?;
        validate_hours(draft.hours)?;
        let date = validate_entry_date(&draft.date)?;

        let entry = TimeEntry {
            id: Uuid::new_v4().to_string(),
            hours: draft.hours,
            date,
            description: normalize_optional(draft.description),
        };
        let task = &mut self.tasks[index];
        task.time_entries.push(entry);
        task.updated_at = Utc::now();
        let entry_index = task.time_entries.len() - 1;
        Ok(&task.time_entries[entry_index])
    }

    /// Replace an entry in place, preserving its id.
    pub fn update_time_entry(
        &mut self,
        task_id: &str,
        entry_id: &str,
        draft: TimeEntryDraft,
    ) -> Result<&TimeEntry> {
        let index = self.position(task_id)?;
        validate_hours(draft.hours)?;
        let date = validate_entry_date(&draft.date)?;

        let task = &mut self.tasks[index];
        let entry_index = task
            .time_entries
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| Error::TimeEntryNotFound(entry_id.to_string()))?;

        let entry = &mut task.time_entries[entry_index];
        entry.hours = draft.hours;
        entry.date = date;
        entry.description = normalize_optional(draft.description);
        task.updated_at = Utc::now();
        Ok(&task.time_entries[entry_index])
    }

    /// Remove an entry by id. Removing an id that is not present is a
    /// no-op; the return value reports whether anything was removed.
    pub fn delete_time_entry(&mut self, task_id: &str, entry_id: &str) -> Result<bool> {
        let index = self.position(task_id)?;
        let task = &mut self.tasks[index];
        let before = task.time_entries.len();
        task.time_entries.retain(|entry| entry.id != entry_id);
        let removed = task.time_entries.len() < before;
        if removed {
            task.updated_at = Utc::now();
        }
        Ok(removed)
    }

    pub fn attachments(&self, task_id: &str) -> Result<&[Attachment]> {
        Ok(&self.get(task_id)?.attachments)
    }

    /// Append uploaded attachments to a task. Returns how many were added.
    pub fn add_attachments(&mut self, task_id: &str, attachments: Vec<Attachment>) -> Result<usize> {
        let index = self.position(task_id)?;
        let task = &mut self.tasks[index];
        let added = attachments.len();
        task.attachments.extend(attachments);
        if added > 0 {
            task.updated_at = Utc::now();
        }
        Ok(added)
    }

    pub fn find_attachment(&self, task_id: &str, attachment_id: &str) -> Result<&Attachment> {
        self.get(task_id)?
            .attachments
            .iter()
            .find(|attachment| attachment.id == attachment_id)
            .ok_or_else(|| Error::AttachmentNotFound(attachment_id.to_string()))
    }

    pub fn delete_attachment(&mut self, task_id: &str, attachment_id: &str) -> Result<Attachment> {
        let index = self.position(task_id)?;
        let task = &mut self.tasks[index];
        let attachment_index = task
            .attachments
            .iter()
            .position(|attachment| attachment.id == attachment_id)
            .ok_or_else(|| Error::AttachmentNotFound(attachment_id.to_string()))?;
        let removed = task.attachments.remove(attachment_index);
        task.updated_at = Utc::now();
        Ok(removed)
    }
}

/// A task-collection document, used to seed one CLI invocation via
/// `--data`. Never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_snapshot_schema")]
    pub schema_version: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

fn default_snapshot_schema() -> String {
    SNAPSHOT_SCHEMA_VERSION.to_string()
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(Error::InvalidArgument(format!(
                "unsupported snapshot schema '{}' (expected {})",
                snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
        }
        tracing::debug!(
            tasks = snapshot.tasks.len(),
            projects = snapshot.projects.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

/// The built-in sample tasks every surface starts from. Dates are pinned
/// to the current day so the calendar and the weekly trend have content.
pub fn sample_tasks() -> Vec<Task> {
    let today = Local::now().date_naive();
    let now = Utc::now();
    let day = |offset: i64| (today + Duration::days(offset)).format(DATE_FORMAT).to_string();
    let created = |offset: i64| now - Duration::days(offset);

    vec![
        Task {
            id: "task-1".to_string(),
            title: "Design new landing page".to_string(),
            description: Some(
                "Create a modern and responsive landing page for the new product launch"
                    .to_string(),
            ),
            priority: Priority::High,
            status: TaskStatus::Completed,
            due_date: Some(day(0)),
            project_id: Some("proj-1".to_string()),
            tags: vec!["design".to_string(), "frontend".to_string()],
            time_entries: vec![
                TimeEntry {
                    id: "entry-1".to_string(),
                    hours: 3.0,
                    date: day(0),
                    description: Some("Initial design mockups".to_string()),
                },
                TimeEntry {
                    id: "entry-2".to_string(),
                    hours: 2.0,
                    date: day(-1),
                    description: Some("Refinements".to_string()),
                },
            ],
            attachments: Vec::new(),
            created_at: created(5),
            updated_at: created(1),
        },
        Task {
            id: "task-2".to_string(),
            title: "Review marketing campaign".to_string(),
            description: Some(
                "Analyze the performance of Q4 marketing campaigns and prepare insights"
                    .to_string(),
            ),
            priority: Priority::Medium,
            status: TaskStatus::InProgress,
            due_date: Some(day(5)),
            project_id: Some("proj-2".to_string()),
            tags: vec!["marketing".to_string(), "analysis".to_string()],
            time_entries: vec![TimeEntry {
                id: "entry-3".to_string(),
                hours: 4.0,
                date: day(-2),
                description: Some("Campaign analysis".to_string()),
            }],
            attachments: Vec::new(),
            created_at: created(4),
            updated_at: created(2),
        },
        Task {
            id: "task-3".to_string(),
            title: "Update documentation".to_string(),
            description: Some(
                "Refresh the onboarding guide to match the latest release".to_string(),
            ),
            priority: Priority::Low,
            status: TaskStatus::Pending,
            due_date: Some(day(2)),
            project_id: Some("proj-1".to_string()),
            tags: vec!["documentation".to_string()],
            time_entries: Vec::new(),
            attachments: Vec::new(),
            created_at: created(3),
            updated_at: created(3),
        },
        Task {
            id: "task-4".to_string(),
            title: "Bug fixes".to_string(),
            description: Some("Resolve the critical issues reported by QA".to_string()),
            priority: Priority::High,
            status: TaskStatus::Completed,
            due_date: Some(day(-2)),
            project_id: Some("proj-3".to_string()),
            tags: vec!["development".to_string()],
            time_entries: vec![TimeEntry {
                id: "entry-4".to_string(),
                hours: 6.0,
                date: day(-3),
                description: Some("Critical bug fixes".to_string()),
            }],
            attachments: Vec::new(),
            created_at: created(2),
            updated_at: created(2),
        },
        Task {
            id: "task-5".to_string(),
            title: "Team standup meeting".to_string(),
            description: Some(
                "Weekly team sync to discuss progress and blockers".to_string(),
            ),
            priority: Priority::Low,
            status: TaskStatus::Pending,
            due_date: Some(day(0)),
            project_id: Some("proj-3".to_string()),
            tags: vec!["meeting".to_string()],
            time_entries: Vec::new(),
            attachments: Vec::new(),
            created_at: created(1),
            updated_at: created(1),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }

    fn entry_draft(hours: f64, date: &str) -> TimeEntryDraft {
        TimeEntryDraft {
            hours,
            date: date.to_string(),
            description: None,
        }
    }

    #[test]
    fn create_assigns_defaults() {
        let mut store = TaskStore::new();
        let task = store
            .create(TaskDraft {
                title: "  Buy milk  ".to_string(),
                tags: Some("errand, , shopping".to_string()),
                ..TaskDraft::default()
            })
            .expect("create");

        assert!(task.id.starts_with("tf-"));
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.tags, vec!["errand".to_string(), "shopping".to_string()]);
        assert!(task.time_entries.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn create_rejects_blank_titles() {
        let mut store = TaskStore::new();
        for bad in ["", "   "] {
            let err = store.create(draft(bad)).expect_err("blank title");
            assert!(err.is_validation());
            assert_eq!(err.to_string(), "Please enter a task title");
        }
        assert!(store.is_empty());
    }

    #[test]
    fn update_patches_without_touching_identity() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Original")).expect("create").id.clone();
        store
            .add_time_entry(&id, entry_draft(2.0, "2024-03-01"))
            .expect("entry");
        let created_at = store.get(&id).expect("get").created_at;

        let task = store
            .update(
                &id,
                TaskPatch {
                    title: Some("Renamed".to_string()),
                    priority: Some(Priority::High),
                    due_date: Some("2024-04-01".to_string()),
                    ..TaskPatch::default()
                },
            )
            .expect("update");

        assert_eq!(task.id, id);
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.time_entries.len(), 1);
        assert!(task.updated_at >= created_at);
    }

    #[test]
    fn update_clears_fields_with_empty_strings() {
        let mut store = TaskStore::new();
        let id = store
            .create(TaskDraft {
                title: "Task".to_string(),
                due_date: Some("2024-04-01".to_string()),
                project_id: Some("proj-1".to_string()),
                ..TaskDraft::default()
            })
            .expect("create")
            .id
            .clone();

        let task = store
            .update(
                &id,
                TaskPatch {
                    due_date: Some(String::new()),
                    project_id: Some(String::new()),
                    ..TaskPatch::default()
                },
            )
            .expect("update");

        assert!(task.due_date.is_none());
        assert!(task.project_id.is_none());
    }

    #[test]
    fn update_rejects_blank_title_without_mutating() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Keep me")).expect("create").id.clone();

        let err = store
            .update(
                &id,
                TaskPatch {
                    title: Some("   ".to_string()),
                    ..TaskPatch::default()
                },
            )
            .expect_err("blank title");
        assert!(err.is_validation());
        assert_eq!(store.get(&id).expect("get").title, "Keep me");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = TaskStore::new();
        let err = store
            .update("tf-missing", TaskPatch::default())
            .expect_err("missing");
        match err {
            Error::TaskNotFound(id) => assert_eq!(id, "tf-missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delete_removes_task_with_children() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Doomed")).expect("create").id.clone();
        store
            .add_time_entry(&id, entry_draft(1.5, "2024-03-01"))
            .expect("entry");

        let removed = store.delete(&id).expect("delete");
        assert_eq!(removed.time_entries.len(), 1);
        assert!(store.is_empty());
        assert!(matches!(
            store.delete(&id),
            Err(Error::TaskNotFound(_))
        ));
    }

    #[test]
    fn toggle_crosses_completed_boundary_both_ways() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Flip")).expect("create").id.clone();

        assert_eq!(
            store.toggle_status(&id).expect("toggle"),
            TaskStatus::Completed
        );
        assert_eq!(
            store.toggle_status(&id).expect("toggle"),
            TaskStatus::Pending
        );
    }

    #[test]
    fn toggle_promotes_in_progress_to_completed() {
        let mut store = TaskStore::from_tasks(sample_tasks());
        assert_eq!(
            store.get("task-2").expect("task-2").status,
            TaskStatus::InProgress
        );
        assert_eq!(
            store.toggle_status("task-2").expect("toggle"),
            TaskStatus::Completed
        );
    }

    #[test]
    fn add_time_entry_validates_hours_and_date() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Logged")).expect("create").id.clone();

        let err = store
            .add_time_entry(&id, entry_draft(0.0, "2024-03-01"))
            .expect_err("zero hours");
        assert!(err.is_validation());

        let err = store
            .add_time_entry(&id, entry_draft(-2.0, "2024-03-01"))
            .expect_err("negative hours");
        assert!(err.is_validation());

        let err = store
            .add_time_entry(&id, entry_draft(2.0, "   "))
            .expect_err("blank date");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please select a date");

        assert!(store.get(&id).expect("get").time_entries.is_empty());
    }

    #[test]
    fn total_hours_round_trips_through_add_and_delete() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Logged")).expect("create").id.clone();
        store
            .add_time_entry(&id, entry_draft(2.5, "2024-03-01"))
            .expect("first entry");
        let before = store.get(&id).expect("get").total_hours();

        let entry_id = store
            .add_time_entry(&id, entry_draft(4.0, "2024-03-02"))
            .expect("second entry")
            .id
            .clone();
        assert_eq!(store.get(&id).expect("get").total_hours(), before + 4.0);

        assert!(store.delete_time_entry(&id, &entry_id).expect("delete"));
        assert_eq!(store.get(&id).expect("get").total_hours(), before);
    }

    #[test]
    fn update_time_entry_replaces_in_place() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Logged")).expect("create").id.clone();
        let entry_id = store
            .add_time_entry(&id, entry_draft(2.0, "2024-03-01"))
            .expect("entry")
            .id
            .clone();

        let updated = store
            .update_time_entry(
                &id,
                &entry_id,
                TimeEntryDraft {
                    hours: 3.5,
                    date: "2024-03-02".to_string(),
                    description: Some("Afternoon session".to_string()),
                },
            )
            .expect("update entry");

        assert_eq!(updated.id, entry_id);
        assert_eq!(updated.hours, 3.5);
        assert_eq!(updated.date, "2024-03-02");
        assert_eq!(store.get(&id).expect("get").time_entries.len(), 1);
    }

    #[test]
    fn delete_time_entry_is_noop_for_unknown_entry() {
        let mut store = TaskStore::new();
        let id = store.create(draft("Logged")).expect("create").id.clone();
        assert!(!store.delete_time_entry(&id, "missing").expect("noop"));
    }

    #[test]
    fn parse_hours_accepts_numbers_and_rejects_garbage() {
        assert_eq!(parse_hours("2.5").expect("parse"), 2.5);
        assert_eq!(parse_hours(" 8 ").expect("parse"), 8.0);
        assert!(parse_hours("abc").expect_err("garbage").is_validation());
        assert!(parse_hours("").expect_err("empty").is_validation());
        assert!(parse_hours("-1").expect_err("negative").is_validation());
    }

    #[test]
    fn parse_tags_drops_empty_segments() {
        assert_eq!(
            parse_tags("design, frontend , ,urgent,"),
            vec![
                "design".to_string(),
                "frontend".to_string(),
                "urgent".to_string()
            ]
        );
        assert!(parse_tags("  ,  ").is_empty());
    }

    #[test]
    fn parse_calendar_date_is_silent_on_garbage() {
        assert_eq!(
            parse_calendar_date("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_calendar_date("not-a-date"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn status_parse_accepts_both_separators() {
        assert_eq!(
            TaskStatus::parse("in-progress").expect("kebab"),
            TaskStatus::InProgress
        );
        assert_eq!(
            TaskStatus::parse("In_Progress").expect("snake"),
            TaskStatus::InProgress
        );
        assert!(TaskStatus::parse("archived").is_err());
    }

    #[test]
    fn sample_data_covers_all_statuses() {
        let store = TaskStore::with_sample_data();
        assert_eq!(store.len(), 5);
        let completed = store.tasks().iter().filter(|t| t.is_completed()).count();
        let in_progress = store
            .tasks()
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .count();
        assert_eq!(completed, 2);
        assert_eq!(in_progress, 1);
        let total: f64 = store.tasks().iter().map(Task::total_hours).sum();
        assert_eq!(total, 15.0);
    }

    #[test]
    fn snapshot_parses_minimal_document() {
        let json = r#"{
            "tasks": [
                {
                    "id": "task-9",
                    "title": "From snapshot",
                    "created_at": "2024-03-01T10:00:00Z",
                    "updated_at": "2024-03-01T10:00:00Z"
                }
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).expect("parse");
        assert_eq!(snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION);
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].status, TaskStatus::Pending);
        assert_eq!(snapshot.tasks[0].priority, Priority::Medium);
        assert!(snapshot.projects.is_empty());
    }
}
