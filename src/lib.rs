//! taskflow - Task Management Library
//!
//! This library provides the core functionality for the taskflow CLI,
//! covering task CRUD, time tracking, file attachments, analytics, and
//! a due-date calendar, plus an interactive terminal dashboard.
//!
//! # Core Concepts
//!
//! - **Tasks**: Titled work items with status, priority, due date, and tags
//! - **Time Entries**: Hours logged against a task on a given date
//! - **Attachments**: Type- and size-checked files carried on a task
//! - **Analytics**: Distributions, per-project progress, and a week trend
//! - **Calendar**: Full-week month grids keyed by due date
//!
//! Each invocation works on an in-memory collection seeded from sample
//! data or a snapshot document; nothing is persisted between runs.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.taskflow.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task model and the in-memory store
//! - `filter`: Status and text filtering over the store
//! - `attachment`: Upload validation, file typing, and downloads
//! - `analytics`: Aggregated statistics over the collection
//! - `calendar`: Month grids and week boundaries
//! - `project`: The fixed project catalog
//! - `events`: JSONL event output for integrations
//! - `output`: Shared human/JSON output formatting
//! - `ui`: Terminal dashboard built on ratatui

pub mod analytics;
pub mod attachment;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod output;
pub mod project;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
