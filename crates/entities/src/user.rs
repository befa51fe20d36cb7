//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role shown for a user or member that has none set.
pub const DEFAULT_ROLE_LABEL: &str = "Team Member";

/// The profile of an account holder.
///
/// The email is the partition key for every per-user collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address, unique across accounts.
    pub email: String,
    /// Company name.
    #[serde(default)]
    pub company: String,
    /// Role selected at signup.
    #[serde(default)]
    pub role: String,
    /// Job title.
    #[serde(default)]
    pub job_title: String,
    /// Short biography.
    #[serde(default)]
    pub bio: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user profile.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            company: String::new(),
            role: String::new(),
            job_title: String::new(),
            bio: String::new(),
            created_at,
        }
    }

    /// Sets the company.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Returns "first last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the upper-cased first letters of first and last name.
    pub fn initials(&self) -> String {
        initials_of(&self.first_name, &self.last_name)
    }

    /// Returns the role, falling back to the default label.
    pub fn role_label(&self) -> &str {
        if self.role.is_empty() {
            DEFAULT_ROLE_LABEL
        } else {
            &self.role
        }
    }
}

/// Upper-cased first letter of each name part.
pub fn initials_of(first: &str, last: &str) -> String {
    first
        .chars()
        .take(1)
        .chain(last.chars().take(1))
        .flat_map(char::to_uppercase)
        .collect()
}
