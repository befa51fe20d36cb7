//! Per-user collections over a key-value store.

use entities::{Activity, Member, Notification, Project};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    KeyValueStore, TaskStoreResult,
    keys::{activity_key, notifications_key, projects_key, team_key},
};

/// Maximum entries kept in the activity and notification logs.
pub const LOG_CAPACITY: usize = 50;

/// Loads and persists the four collections of a user.
///
/// Reads fail soft: an absent, unreadable or malformed collection is an empty
/// one. Writes always overwrite the whole collection.
#[derive(Debug)]
pub struct EntityRepository<S> {
    kv: S,
}

impl<S: KeyValueStore> EntityRepository<S> {
    /// Creates a repository over a key-value store.
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// The underlying store.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Loads the projects and team of a user.
    pub fn load(&self, email: &str) -> (Vec<Project>, Vec<Member>) {
        (self.load_projects(email), self.load_members(email))
    }

    pub fn load_projects(&self, email: &str) -> Vec<Project> {
        self.load_collection(&projects_key(email))
    }

    pub fn load_members(&self, email: &str) -> Vec<Member> {
        self.load_collection(&team_key(email))
    }

    /// Activity log, newest first.
    pub fn load_activities(&self, email: &str) -> Vec<Activity> {
        self.load_collection(&activity_key(email))
    }

    /// Notification log, newest first.
    pub fn load_notifications(&self, email: &str) -> Vec<Notification> {
        self.load_collection(&notifications_key(email))
    }

    pub fn persist_projects(&self, email: &str, projects: &[Project]) -> TaskStoreResult<()> {
        self.persist_collection(&projects_key(email), projects)
    }

    pub fn persist_members(&self, email: &str, members: &[Member]) -> TaskStoreResult<()> {
        self.persist_collection(&team_key(email), members)
    }

    /// Inserts an entry at the front of the activity log.
    pub fn append_activity(&self, email: &str, entry: Activity) -> TaskStoreResult<()> {
        let mut log = self.load_activities(email);
        push_front_capped(&mut log, entry);
        self.persist_collection(&activity_key(email), &log)
    }

    /// Inserts an entry at the front of the notification log.
    pub fn append_notification(&self, email: &str, entry: Notification) -> TaskStoreResult<()> {
        let mut log = self.load_notifications(email);
        push_front_capped(&mut log, entry);
        self.persist_collection(&notifications_key(email), &log)
    }

    /// Marks every notification read. Returns how many were unread.
    pub fn mark_all_read(&self, email: &str) -> TaskStoreResult<usize> {
        let mut log = self.load_notifications(email);
        let mut changed = 0;
        for n in log.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        self.persist_collection(&notifications_key(email), &log)?;
        Ok(changed)
    }

    /// Empties the notification log.
    pub fn clear_notifications(&self, email: &str) -> TaskStoreResult<()> {
        self.persist_collection::<Notification>(&notifications_key(email), &[])
    }

    /// Drops every collection of the user.
    pub fn clear_all(&self, email: &str) -> TaskStoreResult<()> {
        self.persist_projects(email, &[])?;
        self.persist_members(email, &[])?;
        self.kv.remove(&activity_key(email))?;
        self.kv.remove(&notifications_key(email))?;
        tracing::info!(email, "Cleared all user data");
        Ok(())
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_value(key).unwrap_or_default()
    }

    fn persist_collection<T: Serialize>(&self, key: &str, items: &[T]) -> TaskStoreResult<()> {
        self.persist_value(key, items)
    }

    /// Reads and decodes one key. Absent, unreadable and malformed values are
    /// all `None`.
    pub(crate) fn load_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored value, ignoring");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed stored value, ignoring");
                None
            }
        }
    }

    pub(crate) fn persist_value<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> TaskStoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }
}

/// Front insertion with truncation to [`LOG_CAPACITY`]; the oldest entry goes.
fn push_front_capped<T>(log: &mut Vec<T>, entry: T) {
    log.insert(0, entry);
    log.truncate(LOG_CAPACITY);
}
