//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.
//!
//! Every invocation is one self-contained session: the task collection
//! is seeded from the built-in sample data (or a `--data` snapshot),
//! the command runs against it, and the result is printed. Nothing is
//! written back.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::events::{Event, EventDestination, EventKind, EventSink};
use crate::project::ProjectCatalog;
use crate::task::{Snapshot, TaskStore};

mod analytics;
mod attach;
mod calendar;
mod task;
mod time;

/// taskflow - task management from the terminal
///
/// Tasks, time tracking, attachments, analytics, and a month calendar,
/// held in memory for the lifetime of the invocation.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Seed the session from a snapshot document instead of sample data
    #[arg(long, global = true, env = "TASKFLOW_DATA")]
    pub data: Option<PathBuf>,

    /// Path to a config file (defaults to .taskflow.toml discovery)
    #[arg(long, global = true, env = "TASKFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit JSONL events to a file, or "-" for stdout
    #[arg(long, global = true, env = "TASKFLOW_EVENTS")]
    pub events: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run; the dashboard opens when none is given
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Time tracking on a task
    #[command(subcommand)]
    Time(TimeCommands),

    /// File attachments on a task
    #[command(subcommand)]
    Attach(AttachCommands),

    /// Aggregated statistics over the task collection
    #[command(subcommand)]
    Analytics(AnalyticsCommands),

    /// Month calendar of due tasks
    #[command(subcommand)]
    Calendar(CalendarCommands),

    /// Interactive dashboard
    Tui,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    New {
        /// Task title
        title: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Project id (e.g. proj-1)
        #[arg(long)]
        project: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List tasks, optionally filtered
    List {
        /// Only tasks with this status (pending, in-progress, completed, all)
        #[arg(long)]
        status: Option<String>,

        /// Case-insensitive text match over title and description
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one task in full
    Show {
        /// Task id
        id: String,
    },

    /// Edit task fields
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description (empty string clears it)
        #[arg(long)]
        description: Option<String>,

        /// New priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// New due date (empty string clears it)
        #[arg(long)]
        due: Option<String>,

        /// New project id (empty string clears it)
        #[arg(long)]
        project: Option<String>,

        /// New comma-separated tags (empty string clears them)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a task and everything attached to it
    Delete {
        /// Task id
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Flip a task across the completed boundary
    Toggle {
        /// Task id
        id: String,
    },
}

/// Time-tracking subcommands
#[derive(Subcommand, Debug)]
pub enum TimeCommands {
    /// Log time against a task
    Add {
        /// Task id
        task: String,

        /// Hours worked (decimal)
        #[arg(long)]
        hours: String,

        /// Date of the work (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// What the time was spent on
        #[arg(long)]
        description: Option<String>,
    },

    /// List a task's time entries
    List {
        /// Task id
        task: String,
    },

    /// Replace a time entry's fields
    Edit {
        /// Task id
        task: String,

        /// Time entry id
        entry: String,

        /// Hours worked (decimal)
        #[arg(long)]
        hours: String,

        /// Date of the work (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// What the time was spent on
        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a time entry
    Delete {
        /// Task id
        task: String,

        /// Time entry id
        entry: String,
    },
}

/// Attachment subcommands
#[derive(Subcommand, Debug)]
pub enum AttachCommands {
    /// Upload files to a task
    Add {
        /// Task id
        task: String,

        /// Files to upload (paths or globs)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List a task's attachments
    List {
        /// Task id
        task: String,
    },

    /// Delete an attachment
    Delete {
        /// Task id
        task: String,

        /// Attachment id
        attachment: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Save an attachment's bytes to disk
    Download {
        /// Task id
        task: String,

        /// Attachment id
        attachment: String,

        /// Destination path (defaults to the attachment name)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Analytics subcommands
#[derive(Subcommand, Debug)]
pub enum AnalyticsCommands {
    /// Distributions, per-project progress, and time totals
    Summary,

    /// Hours and active tasks for each day of the current week
    Trend {
        /// Anchor date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

/// Calendar subcommands
#[derive(Subcommand, Debug)]
pub enum CalendarCommands {
    /// Month grid with due tasks per day
    Month {
        /// Any date inside the month to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

/// Everything a command needs: the seeded task collection, the project
/// catalog, and the effective config.
pub(crate) struct CommandContext {
    pub store: TaskStore,
    pub catalog: ProjectCatalog,
    pub config: Config,
}

pub(crate) fn load_context(
    data: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<CommandContext> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir()?;
            Config::load_from_dir(&cwd)
        }
    };

    let (store, catalog) = match data {
        Some(path) => {
            let snapshot = Snapshot::load(path)?;
            let catalog = if snapshot.projects.is_empty() {
                ProjectCatalog::sample()
            } else {
                ProjectCatalog::new(snapshot.projects)
            };
            (TaskStore::from_tasks(snapshot.tasks), catalog)
        }
        None => (TaskStore::with_sample_data(), ProjectCatalog::sample()),
    };

    Ok(CommandContext {
        store,
        catalog,
        config,
    })
}

pub(crate) fn open_event_sink(events: Option<&str>) -> Result<(Option<EventSink>, bool)> {
    let destination = EventDestination::parse(events);
    let sink = destination.as_ref().map(|dest| dest.open()).transpose()?;
    let events_to_stdout = matches!(destination, Some(EventDestination::Stdout));
    Ok((sink, events_to_stdout))
}

/// Emit one event, downgrading failures to a warning so the command
/// result still reaches the user.
pub(crate) fn emit_event<T: serde::Serialize>(
    sink: &mut Option<EventSink>,
    kind: EventKind,
    data: T,
) -> Option<String> {
    let sink = sink.as_mut()?;

    let envelope = match Event::new(kind).with_data(data) {
        Ok(envelope) => envelope,
        Err(err) => return Some(format!("event output failed: {err}")),
    };

    if let Err(err) = sink.emit(&envelope) {
        return Some(format!("event output failed: {err}"));
    }

    None
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command.unwrap_or(Commands::Tui) {
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    title,
                    description,
                    priority,
                    due,
                    project,
                    tags,
                } => task::run_new(task::NewOptions {
                    title,
                    description,
                    priority,
                    due,
                    project,
                    tags,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::List { status, search } => task::run_list(task::ListOptions {
                    status,
                    search,
                    data: self.data,
                    config: self.config,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    data: self.data,
                    config: self.config,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                    priority,
                    due,
                    project,
                    tags,
                } => task::run_edit(task::EditOptions {
                    id,
                    title,
                    description,
                    priority,
                    due,
                    project,
                    tags,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Delete { id, yes } => task::run_delete(task::DeleteOptions {
                    id,
                    yes,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Toggle { id } => task::run_toggle(task::ToggleOptions {
                    id,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Time(cmd) => match cmd {
                TimeCommands::Add {
                    task,
                    hours,
                    date,
                    description,
                } => time::run_add(time::AddOptions {
                    task,
                    hours,
                    date,
                    description,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TimeCommands::List { task } => time::run_list(time::ListOptions {
                    task,
                    data: self.data,
                    config: self.config,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TimeCommands::Edit {
                    task,
                    entry,
                    hours,
                    date,
                    description,
                } => time::run_edit(time::EditOptions {
                    task,
                    entry,
                    hours,
                    date,
                    description,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TimeCommands::Delete { task, entry } => time::run_delete(time::DeleteOptions {
                    task,
                    entry,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Attach(cmd) => match cmd {
                AttachCommands::Add { task, paths } => attach::run_add(attach::AddOptions {
                    task,
                    paths,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
                AttachCommands::List { task } => attach::run_list(attach::ListOptions {
                    task,
                    data: self.data,
                    config: self.config,
                    json: self.json,
                    quiet: self.quiet,
                }),
                AttachCommands::Delete {
                    task,
                    attachment,
                    yes,
                } => attach::run_delete(attach::DeleteOptions {
                    task,
                    attachment,
                    yes,
                    data: self.data,
                    config: self.config,
                    events: self.events,
                    json: self.json,
                    quiet: self.quiet,
                }),
                AttachCommands::Download {
                    task,
                    attachment,
                    out,
                } => attach::run_download(attach::DownloadOptions {
                    task,
                    attachment,
                    out,
                    data: self.data,
                    config: self.config,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Analytics(cmd) => match cmd {
                AnalyticsCommands::Summary => {
                    analytics::run_summary(analytics::SummaryOptions {
                        data: self.data,
                        config: self.config,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                AnalyticsCommands::Trend { date } => {
                    analytics::run_trend(analytics::TrendOptions {
                        date,
                        data: self.data,
                        config: self.config,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
            },
            Commands::Calendar(cmd) => match cmd {
                CalendarCommands::Month { date } => {
                    calendar::run_month(calendar::MonthOptions {
                        date,
                        data: self.data,
                        config: self.config,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
            },
            Commands::Tui => {
                let ctx = load_context(self.data.as_deref(), self.config.as_deref())?;
                crate::ui::run(ctx.store, ctx.catalog, ctx.config)
            }
        }
    }
}
