//! Login session records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::SESSION_TTL_HOURS;

/// The record kept for the signed-in user between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Email of the signed-in account.
    pub email: String,
    /// When the user signed in.
    pub login_time: DateTime<Utc>,
    /// Keep the session regardless of age.
    #[serde(default)]
    pub remember: bool,
}

impl SessionRecord {
    /// Creates a session record.
    pub fn new(email: impl Into<String>, login_time: DateTime<Utc>, remember: bool) -> Self {
        Self {
            email: email.into(),
            login_time,
            remember,
        }
    }

    /// A remembered session never expires; others last one day.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.remember {
            return true;
        }
        let valid = now - self.login_time < Duration::hours(SESSION_TTL_HOURS);
        if !valid {
            tracing::debug!(email = %self.email, "Session expired");
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let login = Utc::now();
        let session = SessionRecord::new("a@example.com", login, false);

        assert!(session.is_valid_at(login + Duration::hours(23)));
        assert!(!session.is_valid_at(login + Duration::hours(25)));
    }

    #[test]
    fn test_remembered_session_never_expires() {
        let login = Utc::now();
        let session = SessionRecord::new("a@example.com", login, true);

        assert!(session.is_valid_at(login + Duration::days(365)));
    }
}
