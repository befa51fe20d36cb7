//! Task entity definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{FileAttachment, dates};

/// Priority of a Task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Urgent.
    High,
    /// Normal.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl TaskPriority {
    /// All priorities, highest first.
    pub const ALL: [TaskPriority; 3] = [Self::High, Self::Medium, Self::Low];

    /// Converts the priority to a string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses a priority from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Time-derived identifier, unique within the owning project.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Free-text description.
    #[serde(default, alias = "desc")]
    pub description: String,
    /// Priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Optional due date.
    #[serde(default, with = "dates::optional_date")]
    pub due: Option<NaiveDate>,
    /// Member id of the assignee. Not validated against the team.
    #[serde(default, with = "dates::optional_string")]
    pub assignee: Option<String>,
    /// Attached files.
    #[serde(default)]
    pub files: Vec<FileAttachment>,
    /// Completion flag.
    #[serde(default)]
    pub done: bool,
    /// Set on every transition to done and never cleared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not-done task.
    pub fn new(id: impl Into<String>, title: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::default(),
            due: None,
            assignee: None,
            files: Vec::new(),
            done: false,
            done_at: None,
            created,
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due = Some(due);
        self
    }

    /// Sets the assignee.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Returns true if the task is assigned to the given member id.
    pub fn is_assigned_to(&self, member_id: &str) -> bool {
        self.assignee.as_deref() == Some(member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("1", "Design", Utc::now())
            .with_priority(TaskPriority::High)
            .with_assignee("me");

        assert!(!task.done);
        assert!(task.done_at.is_none());
        assert!(task.is_assigned_to("me"));
        assert!(!task.is_assigned_to("42"));
    }

    #[test]
    fn test_unassigned_empty_string() {
        let json = r#"{
            "id": "1",
            "title": "Write docs",
            "desc": "",
            "priority": "low",
            "due": "2024-02-10",
            "assignee": "",
            "files": [],
            "done": false,
            "created": "2024-01-05T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert!(task.assignee.is_none());
        assert_eq!(task.priority, TaskPriority::Low);
        assert_eq!(task.due, NaiveDate::from_ymd_opt(2024, 2, 10));
    }

    #[test]
    fn test_done_at_camel_case() {
        let mut task = Task::new("1", "Design", Utc::now());
        task.done = true;
        task.done_at = Some(Utc::now());
        let value = serde_json::to_value(&task).unwrap();

        assert!(value.get("doneAt").is_some());
    }
}
