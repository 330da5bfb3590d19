//! taskflow time command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{emit_event, load_context, open_event_sink};
use crate::error::Result;
use crate::events::EventKind;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{parse_hours, TimeEntry, TimeEntryDraft};

/// Options for time add
pub struct AddOptions {
    pub task: String,
    pub hours: String,
    pub date: String,
    pub description: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for time list
pub struct ListOptions {
    pub task: String,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for time edit
pub struct EditOptions {
    pub task: String,
    pub entry: String,
    pub hours: String,
    pub date: String,
    pub description: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for time delete
pub struct DeleteOptions {
    pub task: String,
    pub entry: String,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct TimeEntryOutput {
    task_id: String,
    entry: TimeEntry,
    total_hours: f64,
}

#[derive(Serialize)]
struct TimeListOutput {
    task_id: String,
    total_hours: f64,
    entries: Vec<TimeEntry>,
}

#[derive(Serialize)]
struct TimeDeleteOutput {
    task_id: String,
    entry_id: String,
    removed: bool,
    total_hours: f64,
}

#[derive(Serialize)]
struct TimeEventData {
    task_id: String,
    entry_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;

    let hours = parse_hours(&options.hours)?;
    let entry = ctx
        .store
        .add_time_entry(
            &options.task,
            TimeEntryDraft {
                hours,
                date: options.date,
                description: options.description,
            },
        )?
        .clone();
    let total_hours = ctx.store.get(&options.task)?.total_hours();

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TimeEntryAdded,
        TimeEventData {
            task_id: options.task.clone(),
            entry_id: entry.id.clone(),
            hours: Some(entry.hours),
            date: Some(entry.date.clone()),
        },
    );

    let mut human = HumanOutput::new("Time entry added");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("Task", options.task.clone());
    human.push_summary("Hours", entry.hours.to_string());
    human.push_summary("Date", entry.date.clone());
    human.push_summary("Total hours", total_hours.to_string());

    let output = TimeEntryOutput {
        task_id: options.task,
        entry,
        total_hours,
    };
    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "time add",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let task = ctx.store.get(&options.task)?;

    let output = TimeListOutput {
        task_id: task.id.clone(),
        total_hours: task.total_hours(),
        entries: task.time_entries.clone(),
    };

    let mut human = HumanOutput::new(format!("Time entries for {}", task.id));
    human.push_summary("Entries", output.entries.len().to_string());
    human.push_summary("Total hours", output.total_hours.to_string());
    for entry in &output.entries {
        let mut line = format!("{} {}h on {}", entry.id, entry.hours, entry.date);
        if let Some(description) = entry.description.as_ref() {
            line.push_str(&format!(" ({description})"));
        }
        human.push_detail(line);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "time list",
        &output,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;

    let hours = parse_hours(&options.hours)?;
    let entry = ctx
        .store
        .update_time_entry(
            &options.task,
            &options.entry,
            TimeEntryDraft {
                hours,
                date: options.date,
                description: options.description,
            },
        )?
        .clone();
    let total_hours = ctx.store.get(&options.task)?.total_hours();

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TimeEntryUpdated,
        TimeEventData {
            task_id: options.task.clone(),
            entry_id: entry.id.clone(),
            hours: Some(entry.hours),
            date: Some(entry.date.clone()),
        },
    );

    let mut human = HumanOutput::new("Time entry updated");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("Task", options.task.clone());
    human.push_summary("Hours", entry.hours.to_string());
    human.push_summary("Date", entry.date.clone());
    human.push_summary("Total hours", total_hours.to_string());

    let output = TimeEntryOutput {
        task_id: options.task,
        entry,
        total_hours,
    };
    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "time edit",
        &output,
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;

    let removed = ctx.store.delete_time_entry(&options.task, &options.entry)?;
    let total_hours = ctx.store.get(&options.task)?.total_hours();

    let event_warning = if removed {
        emit_event(
            &mut event_sink,
            EventKind::TimeEntryDeleted,
            TimeEventData {
                task_id: options.task.clone(),
                entry_id: options.entry.clone(),
                hours: None,
                date: None,
            },
        )
    } else {
        None
    };

    let header = if removed {
        "Time entry deleted"
    } else {
        "No matching time entry"
    };
    let mut human = HumanOutput::new(header);
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("Task", options.task.clone());
    human.push_summary("Total hours", total_hours.to_string());

    let output = TimeDeleteOutput {
        task_id: options.task,
        entry_id: options.entry,
        removed,
        total_hours,
    };
    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "time delete",
        &output,
        Some(&human),
    )
}
