//! Whole-account export and reset.

use chrono::{DateTime, Utc};
use entities::{Activity, Member, Project, User};
use serde::{Deserialize, Serialize};

use crate::{AggregateStore, KeyValueStore, Session, TaskStoreResult};

/// Everything a user owns, as written by the data export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub user: User,
    pub projects: Vec<Project>,
    pub team_members: Vec<Member>,
    pub activities: Vec<Activity>,
    pub exported: DateTime<Utc>,
}

impl ExportSnapshot {
    pub fn to_json_pretty(&self) -> TaskStoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested file name, stamped with the export time.
    pub fn file_name(&self) -> String {
        format!("projecthub-data-{}.json", self.exported.timestamp_millis())
    }
}

impl<S: KeyValueStore> AggregateStore<S> {
    /// Snapshots the user's profile, projects, team and activity log.
    pub fn export(&self, session: &Session) -> ExportSnapshot {
        ExportSnapshot {
            user: session.user().clone(),
            projects: self.projects(session),
            team_members: self.members(session),
            activities: self.activities(session),
            exported: self.now(),
        }
    }

    /// Empties projects and team and drops both logs. The account stays.
    pub fn clear_all_data(&mut self, session: &mut Session) -> TaskStoreResult<()> {
        self.repository().clear_all(session.email())?;
        session.clear_selection();
        session.clear_staged_files();
        Ok(())
    }
}
