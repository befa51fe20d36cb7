//! Activity log entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of change recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    Updated,
    Deleted,
    Completed,
}

impl ActivityKind {
    /// Converts the kind to a string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the activity log. The log is stored newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Human readable description.
    pub text: String,
    /// When it happened.
    pub time: DateTime<Utc>,
}

impl Activity {
    /// Creates an activity entry.
    pub fn new(kind: ActivityKind, text: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            kind,
            text: text.into(),
            time,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_display() {
        let entry = Activity::new(ActivityKind::Completed, "Completed task: Design", Utc::now());
        assert_eq!(entry.to_string(), "completed: Completed task: Design");
    }

    #[test]
    fn test_kind_serialized_as_type() {
        let entry = Activity::new(ActivityKind::Deleted, "Deleted project: X", Utc::now());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "deleted");
    }
}
