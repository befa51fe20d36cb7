//! Mutation inputs and results.

use chrono::NaiveDate;
use entities::{Activity, Notification, ProjectStatus, TaskPriority};

use crate::{TaskStoreError, TaskStoreResult};

/// Editable fields of a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
}

impl ProjectInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Editable fields of a task. Files come from the session's staged list.
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub due: Option<NaiveDate>,
    pub assignee: Option<String>,
}

impl TaskInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }
}

/// Fields of a new team member.
#[derive(Debug, Clone, Default)]
pub struct MemberInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl MemberInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            role: String::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

/// What an applied mutation produced.
///
/// Carries enough for a presentation layer to refresh: the entity as stored
/// and the log entries written for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<T> {
    pub entity: T,
    pub activity: Option<Activity>,
    pub notification: Option<Notification>,
}

impl<T> Change<T> {
    pub(crate) fn new(entity: T) -> Self {
        Self {
            entity,
            activity: None,
            notification: None,
        }
    }

    pub(crate) fn with_activity(mut self, activity: Activity) -> Self {
        self.activity = Some(activity);
        self
    }

    pub(crate) fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }
}

/// Result of a mutation addressed by id.
///
/// An id that does not resolve leaves every collection untouched and writes
/// nothing to the logs.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Applied(Change<T>),
    NotFound,
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn change(&self) -> Option<&Change<T>> {
        match self {
            Self::Applied(change) => Some(change),
            Self::NotFound => None,
        }
    }

    pub fn into_change(self) -> Option<Change<T>> {
        match self {
            Self::Applied(change) => Some(change),
            Self::NotFound => None,
        }
    }
}

/// Trims a required field, rejecting blank values.
pub(crate) fn required(value: &str, field: &str) -> TaskStoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskStoreError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
