//! Task filtering and search.
//!
//! Pure predicate filtering over the task collection: a status filter and
//! a case-insensitive free-text query, ANDed together. The result keeps
//! the collection's relative order; nothing is re-sorted.

use crate::error::{Error, Result};
use crate::task::{Task, TaskStatus};

/// Status predicate for task queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn parse(value: &str) -> Result<StatusFilter> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        TaskStatus::parse(value).map(StatusFilter::Only).map_err(|_| {
            Error::InvalidArgument(format!(
                "unknown status filter '{value}' (expected all|pending|in-progress|completed)"
            ))
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    /// Step to the next filter value, wrapping back to All.
    pub fn cycled(&self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(TaskStatus::Pending),
            StatusFilter::Only(TaskStatus::Pending) => {
                StatusFilter::Only(TaskStatus::InProgress)
            }
            StatusFilter::Only(TaskStatus::InProgress) => {
                StatusFilter::Only(TaskStatus::Completed)
            }
            StatusFilter::Only(TaskStatus::Completed) => StatusFilter::All,
        }
    }
}

/// Combined filter input for the task list.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub query: String,
}

impl TaskFilter {
    pub fn new(status: StatusFilter, query: impl Into<String>) -> Self {
        Self {
            status,
            query: query.into(),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.status == StatusFilter::All && self.query.trim().is_empty()
    }
}

/// Indices of tasks passing the filter, in collection order. Index-based
/// so interactive views can keep selection bookkeeping against the
/// unfiltered collection.
pub fn filter_task_indices(tasks: &[Task], filter: &TaskFilter) -> Vec<usize> {
    let query = filter.query.trim().to_lowercase();
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.status.matches(task.status) && matches_query(task, &query))
        .map(|(index, _)| index)
        .collect()
}

/// Borrowed view of the tasks passing the filter, in collection order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    filter_task_indices(tasks, filter)
        .into_iter()
        .map(|index| &tasks[index])
        .collect()
}

fn matches_query(task: &Task, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }
    if task.title.to_lowercase().contains(query_lower) {
        return true;
    }
    task.description
        .as_deref()
        .map(|description| description.to_lowercase().contains(query_lower))
        .unwrap_or(false)
}
