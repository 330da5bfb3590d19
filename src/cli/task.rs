//! taskflow task command implementations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::attachment::AttachmentMeta;
use crate::cli::{emit_event, load_context, open_event_sink};
use crate::error::Result;
use crate::events::EventKind;
use crate::filter::{filter_tasks, StatusFilter, TaskFilter};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::project::ProjectCatalog;
use crate::task::{Priority, Task, TaskDraft, TaskPatch, TaskStatus, TimeEntry};

/// Options for task new
pub struct NewOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub project: Option<String>,
    pub tags: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for task list
pub struct ListOptions {
    pub status: Option<String>,
    pub search: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for task show
pub struct ShowOptions {
    pub id: String,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for task edit
pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub project: Option<String>,
    pub tags: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for task delete
pub struct DeleteOptions {
    pub id: String,
    pub yes: bool,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for task toggle
pub struct ToggleOptions {
    pub id: String,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// A task as emitted by command output: resolved project name, hour
/// total, and attachment metadata instead of raw bytes.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub project_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub total_hours: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub time_entries: Vec<TimeEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentMeta>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    pub fn new(task: &Task, catalog: &ProjectCatalog) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            due_date: task.due_date.clone(),
            project_id: task.project_id.clone(),
            project_name: catalog.name_for(task.project_id.as_deref()),
            tags: task.tags.clone(),
            total_hours: task.total_hours(),
            time_entries: task.time_entries.clone(),
            attachments: task.attachments.iter().map(AttachmentMeta::from).collect(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Serialize)]
struct TaskCreatedOutput {
    id: String,
    status: TaskStatus,
    priority: Priority,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<TaskView>,
}

#[derive(Serialize)]
struct TaskShowOutput {
    task: TaskView,
}

#[derive(Serialize)]
struct TaskUpdatedOutput {
    task: TaskView,
}

#[derive(Serialize)]
struct TaskDeleteOutput {
    id: String,
    deleted: bool,
}

#[derive(Serialize)]
struct TaskToggleOutput {
    id: String,
    status: TaskStatus,
}

#[derive(Serialize)]
struct TaskEventData {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;

    let priority = match options.priority.as_deref() {
        Some(value) => Priority::parse(value)?,
        None => Priority::parse(&ctx.config.defaults.priority)?,
    };
    validate_project(&ctx.catalog, options.project.as_deref())?;

    let task = ctx
        .store
        .create(TaskDraft {
            title: options.title,
            description: options.description,
            priority: Some(priority),
            due_date: options.due,
            project_id: options.project,
            tags: options.tags,
        })?
        .clone();

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskCreated,
        TaskEventData {
            id: task.id.clone(),
            title: Some(task.title.clone()),
            status: Some(task.status),
            priority: Some(task.priority),
        },
    );

    let output = TaskCreatedOutput {
        id: task.id.clone(),
        status: task.status,
        priority: task.priority,
    };

    let mut human = HumanOutput::new("Task created");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Priority", task.priority.to_string());
    if let Some(due) = task.due_date.as_ref() {
        human.push_summary("Due", due.clone());
    }
    if let Some(project) = task.project_id.as_deref() {
        human.push_summary("Project", ctx.catalog.name_for(Some(project)));
    }

    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "task new",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;

    let status = match options.status.as_deref() {
        Some(value) => StatusFilter::parse(value)?,
        None => StatusFilter::All,
    };
    let filter = TaskFilter::new(status, options.search.clone().unwrap_or_default());
    let tasks = filter_tasks(ctx.store.tasks(), &filter);

    let views: Vec<TaskView> = tasks
        .iter()
        .map(|task| TaskView::new(task, &ctx.catalog))
        .collect();
    let output = TaskListOutput {
        total: views.len(),
        tasks: views,
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", output.total.to_string());
    if let StatusFilter::Only(status) = filter.status {
        human.push_summary("Status", status.to_string());
    }
    if !filter.query.is_empty() {
        human.push_summary("Search", filter.query.clone());
    }
    for task in &output.tasks {
        let mut line = format!(
            "[{}][{}] {} {}",
            task.status, task.priority, task.id, task.title
        );
        if task.project_id.is_some() {
            line.push_str(&format!(" (project: {})", task.project_name));
        }
        if let Some(due) = task.due_date.as_ref() {
            line.push_str(&format!(" (due: {due})"));
        }
        if task.total_hours > 0.0 {
            line.push_str(&format!(" ({}h)", task.total_hours));
        }
        human.push_detail(line);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let task = ctx.store.get(&options.id)?;
    let view = TaskView::new(task, &ctx.catalog);

    let mut human = HumanOutput::new(format!("Task {}", view.id));
    human.push_summary("Title", view.title.clone());
    human.push_summary("Status", view.status.to_string());
    human.push_summary("Priority", view.priority.to_string());
    human.push_summary("Project", view.project_name.clone());
    if let Some(due) = view.due_date.as_ref() {
        human.push_summary("Due", due.clone());
    }
    if !view.tags.is_empty() {
        human.push_summary("Tags", view.tags.join(", "));
    }
    human.push_summary("Hours logged", format!("{}", view.total_hours));
    if let Some(description) = view.description.as_ref() {
        human.push_detail(description.clone());
    }
    for entry in &view.time_entries {
        let mut line = format!("{}h on {}", entry.hours, entry.date);
        if let Some(description) = entry.description.as_ref() {
            line.push_str(&format!(" ({description})"));
        }
        human.push_detail(line);
    }
    for attachment in &view.attachments {
        human.push_detail(format!(
            "{} ({}, {})",
            attachment.name, attachment.size_display, attachment.kind
        ));
    }

    let output = TaskShowOutput { task: view };
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task show",
        &output,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;

    let priority = match options.priority.as_deref() {
        Some(value) => Some(Priority::parse(value)?),
        None => None,
    };
    validate_project(&ctx.catalog, options.project.as_deref())?;

    let task = ctx
        .store
        .update(
            &options.id,
            TaskPatch {
                title: options.title,
                description: options.description,
                priority,
                due_date: options.due,
                project_id: options.project,
                tags: options.tags,
            },
        )?
        .clone();

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskUpdated,
        TaskEventData {
            id: task.id.clone(),
            title: Some(task.title.clone()),
            status: Some(task.status),
            priority: Some(task.priority),
        },
    );

    let view = TaskView::new(&task, &ctx.catalog);
    let mut human = HumanOutput::new("Task updated");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("ID", view.id.clone());
    human.push_summary("Title", view.title.clone());
    human.push_summary("Status", view.status.to_string());
    human.push_summary("Priority", view.priority.to_string());

    let output = TaskUpdatedOutput { task: view };
    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "task edit",
        &output,
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;
    let out_options = OutputOptions {
        json: options.json && !events_to_stdout,
        quiet: options.quiet || events_to_stdout,
    };

    if !options.yes {
        let task = ctx.store.get(&options.id)?;
        let output = TaskDeleteOutput {
            id: task.id.clone(),
            deleted: false,
        };
        let mut human = HumanOutput::new("Deletion cancelled");
        human.push_detail("Are you sure you want to delete this task?".to_string());
        human.push_next_step(format!("taskflow task delete {} --yes", task.id));
        return emit_success(out_options, "task delete", &output, Some(&human));
    }

    let removed = ctx.store.delete(&options.id)?;

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskDeleted,
        TaskEventData {
            id: removed.id.clone(),
            title: Some(removed.title.clone()),
            status: None,
            priority: None,
        },
    );

    let output = TaskDeleteOutput {
        id: removed.id.clone(),
        deleted: true,
    };
    let mut human = HumanOutput::new("Task deleted");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("Title", removed.title.clone());
    if !removed.time_entries.is_empty() {
        human.push_summary(
            "Time entries removed",
            removed.time_entries.len().to_string(),
        );
    }
    if !removed.attachments.is_empty() {
        human.push_summary(
            "Attachments removed",
            removed.attachments.len().to_string(),
        );
    }

    emit_success(out_options, "task delete", &output, Some(&human))
}

pub fn run_toggle(options: ToggleOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;

    let status = ctx.store.toggle_status(&options.id)?;

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskToggled,
        TaskEventData {
            id: options.id.clone(),
            title: None,
            status: Some(status),
            priority: None,
        },
    );

    let output = TaskToggleOutput {
        id: options.id.clone(),
        status,
    };
    let mut human = HumanOutput::new(format!("Task marked as {status}"));
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("ID", options.id.clone());
    human.push_summary("Status", status.to_string());

    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "task toggle",
        &output,
        Some(&human),
    )
}

/// A non-empty project id must name a catalog project. Empty values are
/// left alone; they clear the field downstream.
fn validate_project(catalog: &ProjectCatalog, project: Option<&str>) -> Result<()> {
    if let Some(project) = project {
        let trimmed = project.trim();
        if !trimmed.is_empty() {
            catalog.get(trimmed)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{complete_upload, UploadCandidate};
    use crate::task::TaskStore;

    fn seeded_store() -> (TaskStore, ProjectCatalog) {
        (TaskStore::with_sample_data(), ProjectCatalog::sample())
    }

    #[test]
    fn view_resolves_project_and_totals() {
        let (store, catalog) = seeded_store();
        let task = store.get("task-1").expect("task-1");
        let view = TaskView::new(task, &catalog);

        assert_eq!(view.project_name, "Website Redesign");
        assert_eq!(view.total_hours, 5.0);
        assert_eq!(view.time_entries.len(), 2);
    }

    #[test]
    fn view_labels_missing_project() {
        let (mut store, catalog) = seeded_store();
        let task = store
            .create(TaskDraft {
                title: "Orphan".to_string(),
                ..TaskDraft::default()
            })
            .expect("create");
        let view = TaskView::new(task, &catalog);
        assert_eq!(view.project_name, "No Project");
        assert_eq!(view.total_hours, 0.0);
    }

    #[test]
    fn view_strips_attachment_bytes() {
        let (mut store, catalog) = seeded_store();
        let attachments = complete_upload(vec![UploadCandidate::new(
            "notes.txt",
            "text/plain",
            vec![0u8; 2048],
        )]);
        store
            .add_attachments("task-3", attachments)
            .expect("attach");

        let view = TaskView::new(store.get("task-3").expect("task-3"), &catalog);
        assert_eq!(view.attachments.len(), 1);
        let meta = &view.attachments[0];
        assert_eq!(meta.size, 2048);
        assert_eq!(meta.size_display, "2 KB");
        assert_eq!(meta.kind, "file");

        let json = serde_json::to_value(&view).expect("serialize");
        assert!(json["attachments"][0].get("content").is_none());
    }

    #[test]
    fn unknown_project_is_rejected() {
        let (_, catalog) = seeded_store();
        assert!(validate_project(&catalog, Some("proj-1")).is_ok());
        assert!(validate_project(&catalog, Some("  ")).is_ok());
        assert!(validate_project(&catalog, None).is_ok());
        assert!(validate_project(&catalog, Some("proj-9")).is_err());
    }
}
