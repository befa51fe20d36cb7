//! Derived views over a user's collections.
//!
//! Everything here is a pure function of the loaded collections and is
//! recomputed on every read; nothing is cached or persisted.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use entities::{
    FileAttachment, Member, Notification, Project, ProjectStatus, SELF_MEMBER_ID, Task,
    TaskPriority, User,
};
use serde::Serialize;

/// Projects shown on the overview.
pub const OVERVIEW_LIMIT: usize = 6;

/// Deadlines shown next to the calendar.
pub const UPCOMING_DEADLINES_LIMIT: usize = 5;

/// Notifications shown in the dropdown.
pub const RECENT_NOTIFICATIONS_LIMIT: usize = 15;

/// Days covered by the completion trend.
pub const COMPLETION_TREND_DAYS: u32 = 7;

/// Label for a task without assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Label for an assignee id that no longer resolves.
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// Rounded percentage of done tasks; 0 when there are none.
pub fn completion(tasks: &[Task]) -> u8 {
    let done = tasks.iter().filter(|t| t.done).count();
    percent(done, tasks.len())
}

/// Completion of one project.
pub fn project_completion(project: &Project) -> u8 {
    completion(&project.tasks)
}

// Rounds half up, matching `Math.round` for non-negative values.
fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((200 * part + total) / (2 * total)) as u8
}

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub active_projects: usize,
    pub total_tasks: usize,
    pub done_tasks: usize,
    pub completion_rate: u8,
    pub projects_this_month: usize,
    pub productivity_score: u8,
    pub unread_notifications: usize,
}

/// Computes the dashboard headline numbers at `now`.
pub fn dashboard_stats(
    projects: &[Project],
    notifications: &[Notification],
    now: DateTime<Utc>,
) -> DashboardStats {
    let total_tasks = all_tasks(projects).count();
    let done_tasks = all_tasks(projects).filter(|t| t.done).count();
    let completion_rate = percent(done_tasks, total_tasks);

    DashboardStats {
        active_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count(),
        total_tasks,
        done_tasks,
        completion_rate,
        projects_this_month: projects
            .iter()
            .filter(|p| p.created.year() == now.year() && p.created.month() == now.month())
            .count(),
        productivity_score: productivity_score(completion_rate),
        unread_notifications: unread_count(notifications),
    }
}

/// `min(100, rate + 20)`.
pub fn productivity_score(completion_rate: u8) -> u8 {
    completion_rate.saturating_add(20).min(100)
}

/// Number of unread notifications.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// First notifications of the log, newest first.
pub fn recent_notifications(notifications: &[Notification]) -> &[Notification] {
    &notifications[..notifications.len().min(RECENT_NOTIFICATIONS_LIMIT)]
}

/// Every task of every project.
pub fn all_tasks(projects: &[Project]) -> impl Iterator<Item = &Task> {
    projects.iter().flat_map(|p| p.tasks.iter())
}

/// The synthetic self member followed by the stored team.
pub fn all_members(user: &User, members: &[Member]) -> Vec<Member> {
    std::iter::once(Member::synthetic_self(user))
        .chain(members.iter().cloned())
        .collect()
}

/// Assignment counts of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberStats {
    pub member: Member,
    pub assigned: usize,
    pub done: usize,
}

/// Assignment counts for every member, self first.
pub fn member_stats(user: &User, members: &[Member], projects: &[Project]) -> Vec<MemberStats> {
    all_members(user, members)
        .into_iter()
        .map(|member| {
            let assigned: Vec<&Task> = all_tasks(projects)
                .filter(|t| t.is_assigned_to(&member.id))
                .collect();
            MemberStats {
                assigned: assigned.len(),
                done: assigned.iter().filter(|t| t.done).count(),
                member,
            }
        })
        .collect()
}

/// Display name for an assignee reference.
pub fn member_name(user: &User, members: &[Member], assignee: Option<&str>) -> String {
    match assignee {
        None => UNASSIGNED.to_string(),
        Some(SELF_MEMBER_ID) => user.display_name(),
        Some(id) => members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| UNKNOWN_MEMBER.to_string()),
    }
}

/// Initials for an assignee reference, `?` when it does not resolve.
pub fn member_initials(user: &User, members: &[Member], assignee: Option<&str>) -> String {
    match assignee {
        None => "?".to_string(),
        Some(SELF_MEMBER_ID) => user.initials(),
        Some(id) => members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.initials.clone())
            .unwrap_or_else(|| "?".to_string()),
    }
}

/// An open task with a due date, with its project name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline<'a> {
    pub task: &'a Task,
    pub project_name: &'a str,
    pub due: NaiveDate,
}

/// Open tasks with a due date, soonest first. Ties keep collection order.
pub fn deadlines(projects: &[Project]) -> Vec<Deadline<'_>> {
    let mut list: Vec<Deadline<'_>> = projects
        .iter()
        .flat_map(|p| {
            p.tasks.iter().filter(|t| !t.done).filter_map(|t| {
                t.due.map(|due| Deadline {
                    task: t,
                    project_name: &p.name,
                    due,
                })
            })
        })
        .collect();
    list.sort_by_key(|d| d.due);
    list
}

/// The first few deadlines.
pub fn upcoming_deadlines(projects: &[Project]) -> Vec<Deadline<'_>> {
    let mut list = deadlines(projects);
    list.truncate(UPCOMING_DEADLINES_LIMIT);
    list
}

/// Whether any open task is due on `date`.
pub fn has_deadline_on(projects: &[Project], date: NaiveDate) -> bool {
    deadlines(projects).iter().any(|d| d.due == date)
}

/// Days of a month on which an open task is due.
pub fn deadline_days(projects: &[Project], year: i32, month: u32) -> BTreeSet<u32> {
    deadlines(projects)
        .iter()
        .filter(|d| d.due.year() == year && d.due.month() == month)
        .map(|d| d.due.day())
        .collect()
}

/// Projects, optionally restricted to one status.
pub fn filter_projects(projects: &[Project], status: Option<ProjectStatus>) -> Vec<&Project> {
    projects
        .iter()
        .filter(|p| status.is_none_or(|s| p.status == s))
        .collect()
}

/// Case-insensitive substring search on name and description.
pub fn search_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return projects.iter().collect();
    }
    projects
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&query)
                || p.description.to_lowercase().contains(&query)
        })
        .collect()
}

/// Projects shown on the overview.
pub fn overview(projects: &[Project]) -> &[Project] {
    &projects[..projects.len().min(OVERVIEW_LIMIT)]
}

/// Count of projects per status, in [`ProjectStatus::ALL`] order.
pub fn status_breakdown(projects: &[Project]) -> [(ProjectStatus, usize); 3] {
    ProjectStatus::ALL.map(|s| (s, projects.iter().filter(|p| p.status == s).count()))
}

/// Count of tasks per priority, in [`TaskPriority::ALL`] order.
pub fn priority_breakdown(projects: &[Project]) -> [(TaskPriority, usize); 3] {
    TaskPriority::ALL.map(|pr| (pr, all_tasks(projects).filter(|t| t.priority == pr).count()))
}

/// Tasks completed on each of the last days up to `today`, oldest first.
///
/// Counts by `done_at`, so a task completed and then reopened still counts.
pub fn completions_by_day(projects: &[Project], today: NaiveDate) -> Vec<(NaiveDate, usize)> {
    (0..COMPLETION_TREND_DAYS)
        .rev()
        .map(|back| {
            let day = today - Duration::days(i64::from(back));
            let count = all_tasks(projects)
                .filter(|t| t.done_at.is_some_and(|at| at.date_naive() == day))
                .count();
            (day, count)
        })
        .collect()
}

/// Every file attached to any task.
pub fn documents(projects: &[Project]) -> Vec<&FileAttachment> {
    all_tasks(projects).flat_map(|t| t.files.iter()).collect()
}

/// Relative age of a timestamp: `Just now`, `5m ago`, `3h ago`, `2d ago`, or
/// the date after a week.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        _ => then.format("%b %-d, %Y").to_string(),
    }
}
