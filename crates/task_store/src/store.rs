//! The aggregate store: mutations and read accessors for one user.

use chrono::{DateTime, Utc};
use entities::{Activity, ActivityKind, Member, Notification, Project, Task};

use crate::{
    Change, Clock, EntityRepository, IdGenerator, KeyValueStore, MemberInput, MutationOutcome,
    ProjectInput, Session, SystemClock, TaskInput, TaskStoreError, TaskStoreResult,
    mutation::required,
    stats::{self, DashboardStats, MemberStats},
};

/// Projects, tasks and team of the signed-in user, with their logs.
///
/// Every mutation is a synchronous read-modify-write of whole collections:
/// validate, apply, persist, then append to the activity and notification
/// logs. Derived views are recomputed from storage on each read. Mutations take
/// `&mut self`; there is one writer.
pub struct AggregateStore<S> {
    repo: EntityRepository<S>,
    clock: Box<dyn Clock>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> AggregateStore<S> {
    /// Creates a store over a key-value backend using the system clock.
    pub fn new(kv: S) -> Self {
        Self {
            repo: EntityRepository::new(kv),
            clock: Box::new(SystemClock),
            ids: IdGenerator::new(),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn repository(&self) -> &EntityRepository<S> {
        &self.repo
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn projects(&self, session: &Session) -> Vec<Project> {
        self.repo.load_projects(session.email())
    }

    pub fn project(&self, session: &Session, id: &str) -> Option<Project> {
        self.projects(session).into_iter().find(|p| p.id == id)
    }

    /// Stored team, without the synthetic self member.
    pub fn members(&self, session: &Session) -> Vec<Member> {
        self.repo.load_members(session.email())
    }

    /// The synthetic self member followed by the stored team.
    pub fn all_members(&self, session: &Session) -> Vec<Member> {
        stats::all_members(session.user(), &self.members(session))
    }

    pub fn activities(&self, session: &Session) -> Vec<Activity> {
        self.repo.load_activities(session.email())
    }

    pub fn notifications(&self, session: &Session) -> Vec<Notification> {
        self.repo.load_notifications(session.email())
    }

    pub fn dashboard_stats(&self, session: &Session) -> DashboardStats {
        stats::dashboard_stats(
            &self.projects(session),
            &self.notifications(session),
            self.now(),
        )
    }

    pub fn member_stats(&self, session: &Session) -> Vec<MemberStats> {
        stats::member_stats(
            session.user(),
            &self.members(session),
            &self.projects(session),
        )
    }

    /// Marks every notification read. Returns how many were unread.
    pub fn mark_all_read(&mut self, session: &Session) -> TaskStoreResult<usize> {
        self.repo.mark_all_read(session.email())
    }

    pub fn clear_notifications(&mut self, session: &Session) -> TaskStoreResult<()> {
        self.repo.clear_notifications(session.email())
    }

    // =========================================================================
    // Project operations
    // =========================================================================

    /// Creates a project. Names need not be unique.
    pub fn create_project(
        &mut self,
        session: &Session,
        input: ProjectInput,
    ) -> TaskStoreResult<Change<Project>> {
        let name = required(&input.name, "Project name")?;
        let email = session.email();
        let now = self.now();

        let mut projects = self.repo.load_projects(email);
        let id = self
            .ids
            .next_id(now, |id| projects.iter().any(|p| p.id == id));
        let project = Project {
            id,
            name,
            description: input.description.trim().to_string(),
            status: input.status,
            deadline: input.deadline,
            created: now,
            tasks: Vec::new(),
        };
        projects.push(project.clone());
        self.repo.persist_projects(email, &projects)?;

        tracing::debug!(email, project_id = %project.id, "Created project");
        let activity = Activity::new(
            ActivityKind::Created,
            format!("Created project: {}", project.name),
            now,
        );
        let notification = Notification::new(
            "Project Created",
            format!("\"{}\" is ready to go", project.name),
            now,
        );
        self.record(email, &activity, Some(&notification))?;

        Ok(Change::new(project)
            .with_activity(activity)
            .with_notification(notification))
    }

    /// Replaces name, description, status and deadline of a project.
    pub fn update_project(
        &mut self,
        session: &Session,
        project_id: &str,
        input: ProjectInput,
    ) -> TaskStoreResult<MutationOutcome<Project>> {
        let name = required(&input.name, "Project name")?;
        let email = session.email();
        let now = self.now();

        let mut projects = self.repo.load_projects(email);
        let Some(project) = projects.iter_mut().find(|p| p.id == project_id) else {
            tracing::debug!(email, project_id, "Update of unknown project ignored");
            return Ok(MutationOutcome::NotFound);
        };
        project.name = name;
        project.description = input.description.trim().to_string();
        project.status = input.status;
        project.deadline = input.deadline;
        let project = project.clone();
        self.repo.persist_projects(email, &projects)?;

        let activity = Activity::new(
            ActivityKind::Updated,
            format!("Updated project: {}", project.name),
            now,
        );
        self.record(email, &activity, None)?;

        Ok(MutationOutcome::Applied(
            Change::new(project).with_activity(activity),
        ))
    }

    /// Deletes the selected project together with its tasks and clears the
    /// selection.
    pub fn delete_project(
        &mut self,
        session: &mut Session,
    ) -> TaskStoreResult<MutationOutcome<Project>> {
        let project_id = session.require_project()?.to_string();
        let email = session.email().to_string();
        let now = self.now();

        let mut projects = self.repo.load_projects(&email);
        let Some(index) = projects.iter().position(|p| p.id == project_id) else {
            return Ok(MutationOutcome::NotFound);
        };
        let project = projects.remove(index);
        self.repo.persist_projects(&email, &projects)?;
        session.clear_selection();

        tracing::debug!(email = %email, project_id = %project_id, "Deleted project");
        let activity = Activity::new(
            ActivityKind::Deleted,
            format!("Deleted project: {}", project.name),
            now,
        );
        self.record(&email, &activity, None)?;

        Ok(MutationOutcome::Applied(
            Change::new(project).with_activity(activity),
        ))
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Adds a task to the selected project, attaching the staged files.
    pub fn create_task(
        &mut self,
        session: &Session,
        input: TaskInput,
    ) -> TaskStoreResult<Change<Task>> {
        let project_id = session.require_project()?;
        let title = required(&input.title, "Task title")?;
        let email = session.email();
        let now = self.now();

        let mut projects = self.repo.load_projects(email);
        let project = find_project_mut(&mut projects, project_id)?;
        let id = self
            .ids
            .next_id(now, |id| project.tasks.iter().any(|t| t.id == id));
        let task = Task {
            id,
            title,
            description: input.description.trim().to_string(),
            priority: input.priority,
            due: input.due,
            assignee: input.assignee.filter(|a| !a.is_empty()),
            files: session.staged_files().to_vec(),
            done: false,
            done_at: None,
            created: now,
        };
        project.tasks.push(task.clone());
        let project_name = project.name.clone();
        self.repo.persist_projects(email, &projects)?;

        tracing::debug!(email, project_id, task_id = %task.id, "Created task");
        let activity = Activity::new(
            ActivityKind::Created,
            format!("Created task: {}", task.title),
            now,
        );
        let notification = Notification::new(
            "Task Added",
            format!("\"{}\" added to {}", task.title, project_name),
            now,
        );
        self.record(email, &activity, Some(&notification))?;

        Ok(Change::new(task)
            .with_activity(activity)
            .with_notification(notification))
    }

    /// Replaces the editable fields of a task in the selected project.
    ///
    /// The file list is replaced by the session's staged files; stage the
    /// task's current files first (see [`Session::stage_files_from`]) to keep
    /// them. Done state, completion time and creation time are kept.
    pub fn update_task(
        &mut self,
        session: &Session,
        task_id: &str,
        input: TaskInput,
    ) -> TaskStoreResult<MutationOutcome<Task>> {
        let project_id = session.require_project()?;
        let title = required(&input.title, "Task title")?;
        let email = session.email();
        let now = self.now();

        let mut projects = self.repo.load_projects(email);
        let project = find_project_mut(&mut projects, project_id)?;
        let Some(task) = project.task_mut(task_id) else {
            tracing::debug!(email, project_id, task_id, "Update of unknown task ignored");
            return Ok(MutationOutcome::NotFound);
        };
        task.title = title;
        task.description = input.description.trim().to_string();
        task.priority = input.priority;
        task.due = input.due;
        task.assignee = input.assignee.filter(|a| !a.is_empty());
        task.files = session.staged_files().to_vec();
        let task = task.clone();
        self.repo.persist_projects(email, &projects)?;

        let activity = Activity::new(
            ActivityKind::Updated,
            format!("Updated task: {}", task.title),
            now,
        );
        self.record(email, &activity, None)?;

        Ok(MutationOutcome::Applied(
            Change::new(task).with_activity(activity),
        ))
    }

    /// Removes a task from the selected project.
    pub fn delete_task(
        &mut self,
        session: &Session,
        task_id: &str,
    ) -> TaskStoreResult<MutationOutcome<Task>> {
        let project_id = session.require_project()?;
        let email = session.email();
        let now = self.now();

        let mut projects = self.repo.load_projects(email);
        let project = find_project_mut(&mut projects, project_id)?;
        let Some(index) = project.tasks.iter().position(|t| t.id == task_id) else {
            return Ok(MutationOutcome::NotFound);
        };
        let task = project.tasks.remove(index);
        self.repo.persist_projects(email, &projects)?;

        tracing::debug!(email, project_id, task_id, "Deleted task");
        let activity = Activity::new(
            ActivityKind::Deleted,
            format!("Deleted task: {}", task.title),
            now,
        );
        self.record(email, &activity, None)?;

        Ok(MutationOutcome::Applied(
            Change::new(task).with_activity(activity),
        ))
    }

    /// Flips the done flag of a task in the selected project.
    ///
    /// Only the transition to done is logged and notified, and it stamps
    /// `done_at`. Reopening writes no log entries and keeps the old `done_at`.
    pub fn toggle_task(
        &mut self,
        session: &Session,
        task_id: &str,
    ) -> TaskStoreResult<MutationOutcome<Task>> {
        let project_id = session.require_project()?;
        let email = session.email();
        let now = self.now();

        let mut projects = self.repo.load_projects(email);
        let project = find_project_mut(&mut projects, project_id)?;
        let Some(task) = project.task_mut(task_id) else {
            return Ok(MutationOutcome::NotFound);
        };
        task.done = !task.done;
        if task.done {
            task.done_at = Some(now);
        }
        let task = task.clone();
        self.repo.persist_projects(email, &projects)?;

        tracing::debug!(email, project_id, task_id, done = task.done, "Toggled task");
        if !task.done {
            return Ok(MutationOutcome::Applied(Change::new(task)));
        }

        let activity = Activity::new(
            ActivityKind::Completed,
            format!("Completed task: {}", task.title),
            now,
        );
        let notification = Notification::new(
            "Task Done ✓",
            format!("\"{}\" is complete", task.title),
            now,
        );
        self.record(email, &activity, Some(&notification))?;

        Ok(MutationOutcome::Applied(
            Change::new(task)
                .with_activity(activity)
                .with_notification(notification),
        ))
    }

    // =========================================================================
    // Team operations
    // =========================================================================

    /// Adds a team member. Emails are unique within the team.
    pub fn create_member(
        &mut self,
        session: &Session,
        input: MemberInput,
    ) -> TaskStoreResult<Change<Member>> {
        let first_name = required(&input.first_name, "First name")?;
        let last_name = required(&input.last_name, "Last name")?;
        let member_email = required(&input.email, "Email")?;
        let email = session.email();
        let now = self.now();

        let mut members = self.repo.load_members(email);
        if members.iter().any(|m| m.email == member_email) {
            return Err(TaskStoreError::already_exists("Member", member_email));
        }
        let id = self
            .ids
            .next_id(now, |id| members.iter().any(|m| m.id == id));
        let member = Member::new(id, &first_name, &last_name, member_email, now)
            .with_role(input.role.trim());
        members.push(member.clone());
        self.repo.persist_members(email, &members)?;

        tracing::debug!(email, member_id = %member.id, "Added team member");
        let activity = Activity::new(
            ActivityKind::Created,
            format!("Added team member: {}", member.name),
            now,
        );
        let notification = Notification::new(
            "Member Added",
            format!("{} joined the team", member.name),
            now,
        );
        self.record(email, &activity, Some(&notification))?;

        Ok(Change::new(member)
            .with_activity(activity)
            .with_notification(notification))
    }

    /// Appends to the logs after a mutation has been persisted.
    pub(crate) fn record(
        &self,
        email: &str,
        activity: &Activity,
        notification: Option<&Notification>,
    ) -> TaskStoreResult<()> {
        self.repo.append_activity(email, activity.clone())?;
        if let Some(notification) = notification {
            self.repo.append_notification(email, notification.clone())?;
        }
        Ok(())
    }
}

fn find_project_mut<'a>(
    projects: &'a mut [Project],
    project_id: &str,
) -> TaskStoreResult<&'a mut Project> {
    projects
        .iter_mut()
        .find(|p| p.id == project_id)
        .ok_or_else(|| TaskStoreError::not_found("Project", project_id))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use entities::{FileAttachment, ProjectStatus, TaskPriority, User};

    use super::*;
    use crate::{FixedClock, LOG_CAPACITY, MemoryKvStore, stats::project_completion};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    fn setup() -> (AggregateStore<MemoryKvStore>, Session) {
        let store = AggregateStore::new(MemoryKvStore::new()).with_clock(FixedClock(now()));
        let user = User::new("Ada", "Lovelace", "ada@example.com", now());
        (store, Session::new(user))
    }

    fn with_project(
        store: &mut AggregateStore<MemoryKvStore>,
        session: Session,
        name: &str,
    ) -> Session {
        let project = store
            .create_project(&session, ProjectInput::new(name))
            .unwrap()
            .entity;
        session.with_project(project.id)
    }

    #[test]
    fn test_end_to_end_completion() {
        let (mut store, session) = setup();
        let created = store
            .create_project(
                &session,
                ProjectInput::new("Launch").with_status(ProjectStatus::Active),
            )
            .unwrap();
        let session = session.with_project(created.entity.id.clone());

        let task = store
            .create_task(
                &session,
                TaskInput::new("Design").with_priority(TaskPriority::High),
            )
            .unwrap()
            .entity;
        let project = store.project(&session, &created.entity.id).unwrap();
        assert_eq!(project_completion(&project), 0);

        store.toggle_task(&session, &task.id).unwrap();
        let project = store.project(&session, &created.entity.id).unwrap();
        assert_eq!(project_completion(&project), 100);

        let activities = store.activities(&session);
        assert_eq!(activities[0].to_string(), "completed: Completed task: Design");
        assert_eq!(store.notifications(&session)[0].title, "Task Done ✓");
    }

    #[test]
    fn test_create_project_records_logs() {
        let (mut store, session) = setup();
        let change = store
            .create_project(
                &session,
                ProjectInput::new("  Launch  ")
                    .with_description(" Ship v1 ")
                    .with_deadline(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            )
            .unwrap();

        assert_eq!(change.entity.name, "Launch");
        assert_eq!(change.entity.description, "Ship v1");
        assert_eq!(change.entity.created, now());
        assert_eq!(change.entity.id, now().timestamp_millis().to_string());
        assert!(change.entity.tasks.is_empty());
        assert_eq!(
            change.activity.as_ref().unwrap().text,
            "Created project: Launch"
        );
        assert_eq!(change.notification.as_ref().unwrap().text, "\"Launch\" is ready to go");
        assert_eq!(store.projects(&session), vec![change.entity]);
        assert_eq!(store.activities(&session).len(), 1);
        assert_eq!(store.notifications(&session).len(), 1);
    }

    #[test]
    fn test_duplicate_project_names_allowed() {
        let (mut store, session) = setup();
        let a = store
            .create_project(&session, ProjectInput::new("Launch"))
            .unwrap();
        let b = store
            .create_project(&session, ProjectInput::new("Launch"))
            .unwrap();

        assert_ne!(a.entity.id, b.entity.id);
        assert_eq!(store.projects(&session).len(), 2);
    }

    #[test]
    fn test_ids_unique_across_store_instances() {
        let kv = MemoryKvStore::new();
        let session = Session::new(User::new("Ada", "Lovelace", "ada@example.com", now()));
        let mut first = AggregateStore::new(&kv).with_clock(FixedClock(now()));
        let mut second = AggregateStore::new(&kv).with_clock(FixedClock(now()));

        let a = first
            .create_project(&session, ProjectInput::new("Launch"))
            .unwrap();
        let b = second
            .create_project(&session, ProjectInput::new("Launch"))
            .unwrap();

        assert_ne!(a.entity.id, b.entity.id);
        assert_eq!(second.projects(&session).len(), 2);
    }

    #[test]
    fn test_blank_project_name_rejected() {
        let (mut store, session) = setup();
        store
            .create_project(&session, ProjectInput::new("Launch"))
            .unwrap();

        let err = store
            .create_project(&session, ProjectInput::new("   "))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.projects(&session).len(), 1);
        assert_eq!(store.activities(&session).len(), 1);
    }

    #[test]
    fn test_update_project_keeps_identity_and_tasks() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");
        let project_id = session.current_project().unwrap().to_string();
        store
            .create_task(&session, TaskInput::new("Design"))
            .unwrap();

        let outcome = store
            .update_project(
                &session,
                &project_id,
                ProjectInput::new("Relaunch").with_status(ProjectStatus::Completed),
            )
            .unwrap();

        let change = outcome.into_change().unwrap();
        assert_eq!(change.entity.id, project_id);
        assert_eq!(change.entity.name, "Relaunch");
        assert_eq!(change.entity.status, ProjectStatus::Completed);
        assert_eq!(change.entity.tasks.len(), 1);
        assert!(change.notification.is_none());
        assert_eq!(
            store.activities(&session)[0].text,
            "Updated project: Relaunch"
        );
    }

    #[test]
    fn test_update_unknown_project_is_not_found() {
        let (mut store, session) = setup();
        store
            .create_project(&session, ProjectInput::new("Launch"))
            .unwrap();
        let before = store.projects(&session);

        let outcome = store
            .update_project(&session, "missing", ProjectInput::new("Other"))
            .unwrap();

        assert_eq!(outcome, MutationOutcome::NotFound);
        assert_eq!(store.projects(&session), before);
        assert_eq!(store.activities(&session).len(), 1);
    }

    #[test]
    fn test_delete_project_removes_tasks() {
        let (mut store, session) = setup();
        let keep = store
            .create_project(&session, ProjectInput::new("Keep"))
            .unwrap()
            .entity;
        let mut session = with_project(&mut store, session, "Drop");
        let task = store
            .create_task(&session, TaskInput::new("Orphan"))
            .unwrap()
            .entity;

        let outcome = store.delete_project(&mut session).unwrap();

        assert!(outcome.is_applied());
        assert!(session.current_project().is_none());
        let projects = store.projects(&session);
        assert_eq!(projects, vec![keep]);
        assert!(stats::all_tasks(&projects).all(|t| t.id != task.id));
        assert_eq!(store.activities(&session)[0].text, "Deleted project: Drop");
    }

    #[test]
    fn test_delete_unknown_project_is_noop() {
        let (mut store, session) = setup();
        store
            .create_project(&session, ProjectInput::new("Keep"))
            .unwrap();
        let mut session = session.with_project("missing");

        let outcome = store.delete_project(&mut session).unwrap();

        assert_eq!(outcome, MutationOutcome::NotFound);
        assert_eq!(store.projects(&session).len(), 1);
        assert_eq!(store.activities(&session).len(), 1);
    }

    #[test]
    fn test_delete_project_requires_selection() {
        let (mut store, mut session) = setup();
        assert!(matches!(
            store.delete_project(&mut session),
            Err(TaskStoreError::NoProjectSelected)
        ));
    }

    #[test]
    fn test_task_requires_project_context() {
        let (mut store, session) = setup();
        assert!(matches!(
            store.create_task(&session, TaskInput::new("Design")),
            Err(TaskStoreError::NoProjectSelected)
        ));

        let session = session.with_project("missing");
        assert!(matches!(
            store.create_task(&session, TaskInput::new("Design")),
            Err(TaskStoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_create_task_snapshots_staged_files() {
        let (mut store, session) = setup();
        let mut session = with_project(&mut store, session, "Launch");
        session
            .stage_file(FileAttachment::new("brief.pdf", 2048, "application/pdf", "JVBERi0="))
            .unwrap();

        let change = store
            .create_task(
                &session,
                TaskInput::new("Design")
                    .with_assignee("me")
                    .with_due(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            )
            .unwrap();

        assert!(!change.entity.done);
        assert_eq!(change.entity.files.len(), 1);
        assert_eq!(change.entity.assignee.as_deref(), Some("me"));
        assert_eq!(
            change.notification.unwrap().text,
            "\"Design\" added to Launch"
        );

        session.clear_staged_files();
        let project = store
            .project(&session, session.current_project().unwrap())
            .unwrap();
        assert_eq!(project.tasks[0].files[0].name, "brief.pdf");
    }

    #[test]
    fn test_blank_task_title_rejected() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");

        let err = store
            .create_task(&session, TaskInput::new(" "))
            .unwrap_err();
        assert!(err.is_validation());
        let project = store
            .project(&session, session.current_project().unwrap())
            .unwrap();
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn test_update_task_keeps_done_state() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");
        let task = store
            .create_task(&session, TaskInput::new("Design"))
            .unwrap()
            .entity;
        store.toggle_task(&session, &task.id).unwrap();

        let change = store
            .update_task(
                &session,
                &task.id,
                TaskInput::new("Design v2").with_priority(TaskPriority::Low),
            )
            .unwrap()
            .into_change()
            .unwrap();

        assert_eq!(change.entity.id, task.id);
        assert_eq!(change.entity.title, "Design v2");
        assert_eq!(change.entity.priority, TaskPriority::Low);
        assert!(change.entity.done);
        assert_eq!(change.entity.done_at, Some(now()));
        assert_eq!(change.entity.created, task.created);
        assert!(change.notification.is_none());
    }

    #[test]
    fn test_update_unknown_task_is_not_found() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");

        let outcome = store
            .update_task(&session, "missing", TaskInput::new("X"))
            .unwrap();
        assert_eq!(outcome, MutationOutcome::NotFound);
        assert_eq!(store.activities(&session).len(), 1);
    }

    #[test]
    fn test_delete_task_logs_only_when_found() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");
        let task = store
            .create_task(&session, TaskInput::new("Design"))
            .unwrap()
            .entity;

        let missing = store.delete_task(&session, "missing").unwrap();
        assert_eq!(missing, MutationOutcome::NotFound);
        assert_eq!(store.activities(&session).len(), 2);

        let deleted = store.delete_task(&session, &task.id).unwrap();
        assert!(deleted.is_applied());
        assert_eq!(store.activities(&session)[0].text, "Deleted task: Design");
        let project = store
            .project(&session, session.current_project().unwrap())
            .unwrap();
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn test_toggle_is_asymmetric() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");
        let task = store
            .create_task(&session, TaskInput::new("Design"))
            .unwrap()
            .entity;
        let activities_before = store.activities(&session).len();
        let notifications_before = store.notifications(&session).len();

        let done = store
            .toggle_task(&session, &task.id)
            .unwrap()
            .into_change()
            .unwrap();
        assert!(done.entity.done);
        assert_eq!(done.entity.done_at, Some(now()));
        assert_eq!(done.activity.unwrap().kind, ActivityKind::Completed);
        assert_eq!(store.activities(&session).len(), activities_before + 1);
        assert_eq!(store.notifications(&session).len(), notifications_before + 1);

        let reopened = store
            .toggle_task(&session, &task.id)
            .unwrap()
            .into_change()
            .unwrap();
        assert!(!reopened.entity.done);
        assert_eq!(reopened.entity.done_at, Some(now()));
        assert!(reopened.activity.is_none());
        assert!(reopened.notification.is_none());
        assert_eq!(store.activities(&session).len(), activities_before + 1);
        assert_eq!(store.notifications(&session).len(), notifications_before + 1);
    }

    #[test]
    fn test_toggle_unknown_task() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");
        assert_eq!(
            store.toggle_task(&session, "missing").unwrap(),
            MutationOutcome::NotFound
        );
    }

    #[test]
    fn test_create_member() {
        let (mut store, session) = setup();
        let change = store
            .create_member(
                &session,
                MemberInput::new(" grace ", "hopper", "grace@example.com").with_role("developer"),
            )
            .unwrap();

        assert_eq!(change.entity.name, "grace hopper");
        assert_eq!(change.entity.initials, "GH");
        assert_eq!(change.entity.role, "developer");
        assert_eq!(
            change.activity.unwrap().text,
            "Added team member: grace hopper"
        );
        assert_eq!(
            change.notification.unwrap().text,
            "grace hopper joined the team"
        );
        assert_eq!(store.all_members(&session).len(), 2);
    }

    #[test]
    fn test_duplicate_member_email_rejected() {
        let (mut store, session) = setup();
        store
            .create_member(&session, MemberInput::new("Grace", "Hopper", "grace@example.com"))
            .unwrap();
        let activities = store.activities(&session).len();

        let err = store
            .create_member(&session, MemberInput::new("G", "H", "grace@example.com"))
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.members(&session).len(), 1);
        assert_eq!(store.activities(&session).len(), activities);
    }

    #[test]
    fn test_member_requires_all_fields() {
        let (mut store, session) = setup();
        for input in [
            MemberInput::new("", "Hopper", "g@example.com"),
            MemberInput::new("Grace", " ", "g@example.com"),
            MemberInput::new("Grace", "Hopper", ""),
        ] {
            assert!(store.create_member(&session, input).unwrap_err().is_validation());
        }
        assert!(store.members(&session).is_empty());
        assert!(store.activities(&session).is_empty());
    }

    #[test]
    fn test_logs_capped_across_mutations() {
        let (mut store, session) = setup();
        for i in 0..LOG_CAPACITY + 5 {
            store
                .create_project(&session, ProjectInput::new(format!("P{i}")))
                .unwrap();
        }

        let activities = store.activities(&session);
        assert_eq!(activities.len(), LOG_CAPACITY);
        assert_eq!(activities[0].text, format!("Created project: P{}", LOG_CAPACITY + 4));
        assert_eq!(store.notifications(&session).len(), LOG_CAPACITY);
        assert_eq!(store.projects(&session).len(), LOG_CAPACITY + 5);
    }

    #[test]
    fn test_dashboard_and_member_stats() {
        let (mut store, session) = setup();
        let session = with_project(&mut store, session, "Launch");
        let task = store
            .create_task(&session, TaskInput::new("Design").with_assignee("me"))
            .unwrap()
            .entity;
        store
            .create_task(&session, TaskInput::new("Build"))
            .unwrap();
        store.toggle_task(&session, &task.id).unwrap();

        let stats = store.dashboard_stats(&session);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.completion_rate, 50);
        assert_eq!(stats.productivity_score, 70);
        assert_eq!(stats.projects_this_month, 1);
        assert_eq!(stats.unread_notifications, 4);

        let members = store.member_stats(&session);
        assert_eq!((members[0].assigned, members[0].done), (1, 1));

        assert_eq!(store.mark_all_read(&session).unwrap(), 4);
        assert_eq!(store.dashboard_stats(&session).unread_notifications, 0);
    }
}
