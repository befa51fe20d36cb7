//! Project entity definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Task, dates};

/// Status of a Project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Being worked on.
    #[default]
    Active,
    /// Not started or on hold.
    Pending,
    /// Finished.
    Completed,
}

impl ProjectStatus {
    /// All statuses, in display order.
    pub const ALL: [ProjectStatus; 3] = [Self::Active, Self::Pending, Self::Completed];

    /// Converts the status to a string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A project owned by one user. Tasks live only inside their project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Time-derived identifier, unique within the owner's collection.
    pub id: String,
    /// Project name. Not a uniqueness key.
    pub name: String,
    /// Free-text description.
    #[serde(default, alias = "desc")]
    pub description: String,
    /// Current status.
    #[serde(default)]
    pub status: ProjectStatus,
    /// Optional deadline.
    #[serde(default, with = "dates::optional_date")]
    pub deadline: Option<NaiveDate>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Owned tasks, in insertion order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Creates a new project with no tasks.
    pub fn new(id: impl Into<String>, name: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::default(),
            deadline: None,
            created,
            tasks: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Finds a task by id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Finds a task by id for mutation.
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Number of tasks marked done.
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }
}
