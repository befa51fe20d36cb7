//! Storage keys.
//!
//! Every per-user collection is stored under its own key, partitioned by the
//! user's email.

/// Global collection of accounts.
pub const USERS_KEY: &str = "users";

/// The signed-in session.
pub const CURRENT_SESSION_KEY: &str = "currentUser";

/// Key of the user's projects.
pub fn projects_key(email: &str) -> String {
    format!("projects_{email}")
}

/// Key of the user's team members.
pub fn team_key(email: &str) -> String {
    format!("team_{email}")
}

/// Key of the user's activity log.
pub fn activity_key(email: &str) -> String {
    format!("act_{email}")
}

/// Key of the user's notification log.
pub fn notifications_key(email: &str) -> String {
    format!("notifs_{email}")
}
