//! Notification log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification shown to the user. The log is stored newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short heading.
    pub title: String,
    /// Body text.
    pub text: String,
    /// When it was raised.
    pub time: DateTime<Utc>,
    /// Whether the user has seen it.
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Creates an unread notification.
    pub fn new(title: impl Into<String>, text: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            time,
            read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults_unread() {
        let n = Notification::new("Task Added", "\"Design\" added to Launch", Utc::now());
        assert!(!n.read);

        let json = r#"{"title":"t","text":"x","time":"2024-01-01T00:00:00Z"}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert!(!n.read);
    }
}
