//! Per-request session context.

use entities::{FileAttachment, MAX_ATTACHMENT_BYTES, Task, User};

use crate::{TaskStoreError, TaskStoreResult};

/// Everything a mutation needs to know about who is acting and on what.
///
/// Holds the signed-in user, the selected project, and the files staged for
/// the next task save.
#[derive(Debug, Clone)]
pub struct Session {
    user: User,
    current_project: Option<String>,
    staged_files: Vec<FileAttachment>,
}

impl Session {
    /// Creates a session for a user with nothing selected.
    pub fn new(user: User) -> Self {
        Self {
            user,
            current_project: None,
            staged_files: Vec::new(),
        }
    }

    /// Selects a project.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.select_project(project_id);
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub(crate) fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    /// Partition key of every per-user collection.
    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn current_project(&self) -> Option<&str> {
        self.current_project.as_deref()
    }

    pub fn select_project(&mut self, project_id: impl Into<String>) {
        self.current_project = Some(project_id.into());
    }

    pub fn clear_selection(&mut self) {
        self.current_project = None;
    }

    /// Selected project id, or an error when nothing is selected.
    pub(crate) fn require_project(&self) -> TaskStoreResult<&str> {
        self.current_project()
            .ok_or(TaskStoreError::NoProjectSelected)
    }

    /// Stages an already encoded file for the next task save.
    pub fn stage_file(&mut self, file: FileAttachment) -> TaskStoreResult<()> {
        if file.size > MAX_ATTACHMENT_BYTES {
            return Err(TaskStoreError::validation(format!(
                "{} exceeds 10MB limit",
                file.name
            )));
        }
        self.staged_files.push(file);
        Ok(())
    }

    /// Removes a staged file by position.
    pub fn unstage_file(&mut self, index: usize) -> Option<FileAttachment> {
        (index < self.staged_files.len()).then(|| self.staged_files.remove(index))
    }

    /// Replaces the staged files with those of a task about to be edited.
    pub fn stage_files_from(&mut self, task: &Task) {
        self.staged_files = task.files.clone();
    }

    pub fn clear_staged_files(&mut self) {
        self.staged_files.clear();
    }

    pub fn staged_files(&self) -> &[FileAttachment] {
        &self.staged_files
    }
}
