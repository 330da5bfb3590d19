//! Project reference data.
//!
//! Projects are read-only grouping labels. Tasks reference them by project id
//! as a weak reference: a dangling or missing id resolves to the
//! "No Project" label instead of an error.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Label used when a task has no project or references an unknown id.
pub const NO_PROJECT_LABEL: &str = "No Project";

/// Fallback swatch for tasks outside any known project.
pub const NO_PROJECT_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Display color as a hex string, e.g. "#6366f1".
    pub color: String,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Static lookup table of known projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// The built-in catalog every surface starts from.
    pub fn sample() -> Self {
        Self::new(vec![
            Project::new("proj-1", "Website Redesign", "#6366f1"),
            Project::new("proj-2", "Marketing Campaign", "#f59e0b"),
            Project::new("proj-3", "Mobile App", "#10b981"),
        ])
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn find(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == project_id)
    }

    pub fn get(&self, project_id: &str) -> Result<&Project> {
        self.find(project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }

    /// Resolve a task's project reference to a display name. Dangling and
    /// absent references both yield the "No Project" label.
    pub fn name_for(&self, project_id: Option<&str>) -> String {
        project_id
            .and_then(|id| self.find(id))
            .map(|project| project.name.clone())
            .unwrap_or_else(|| NO_PROJECT_LABEL.to_string())
    }

    /// Display color for a task's project reference.
    pub fn color_for(&self, project_id: Option<&str>) -> String {
        project_id
            .and_then(|id| self.find(id))
            .map(|project| project.color.clone())
            .unwrap_or_else(|| NO_PROJECT_COLOR.to_string())
    }
}
