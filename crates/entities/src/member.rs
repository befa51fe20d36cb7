//! Team member definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{User, initials_of};

/// Reserved id of the synthetic member standing for the signed-in user.
pub const SELF_MEMBER_ID: &str = "me";

/// A colleague on the user's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Time-derived identifier, unique within the team.
    pub id: String,
    /// "First Last".
    pub name: String,
    /// Email address, unique within the team.
    pub email: String,
    /// Role on the team.
    #[serde(default)]
    pub role: String,
    /// Computed from the name at creation and never recomputed.
    pub initials: String,
    /// When the member was added.
    pub added: DateTime<Utc>,
}

impl Member {
    /// Creates a member, deriving the display name and initials.
    pub fn new(
        id: impl Into<String>,
        first_name: &str,
        last_name: &str,
        email: impl Into<String>,
        added: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: format!("{first_name} {last_name}"),
            email: email.into(),
            role: String::new(),
            initials: initials_of(first_name, last_name),
            added,
        }
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// The synthetic member for the signed-in user. Never stored.
    pub fn synthetic_self(user: &User) -> Self {
        Self {
            id: SELF_MEMBER_ID.to_string(),
            name: user.display_name(),
            email: user.email.clone(),
            role: user.role_label().to_string(),
            initials: user.initials(),
            added: user.created_at,
        }
    }

    /// Returns true for the synthetic self member.
    pub fn is_self(&self) -> bool {
        self.id == SELF_MEMBER_ID
    }
}
