//! Command execution against the aggregate store.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use auth::PasswordStrength;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Datelike;
use entities::{FileAttachment, MAX_ATTACHMENT_BYTES, Project};
use task_store::{
    AggregateStore, Change, KeyValueStore, MemberInput, MutationOutcome, ProfileInput,
    ProjectInput, Session, SignupInput, TaskInput,
    stats::{self, time_ago},
};

use crate::cli::{
    Commands, MemberCommands, NotificationCommands, ProfileArgs, ProjectArgs, ProjectCommands,
    TaskArgs, TaskCommands,
};

/// Runs one command, writing human-readable output.
pub fn run<S: KeyValueStore, W: Write>(
    store: &mut AggregateStore<S>,
    project: Option<String>,
    command: Commands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
            confirm,
            company,
            role,
        } => {
            let mut input = SignupInput::new(first_name, last_name, email, password)
                .with_company(company)
                .with_role(role);
            if let Some(confirm) = confirm {
                input = input.with_confirmation(confirm);
            }
            let session = store.sign_up(input)?;
            writeln!(out, "Account created for {}", session.user().display_name())?;
        }
        Commands::Login {
            email,
            password,
            remember,
        } => {
            let session = store.log_in(&email, &password, remember)?;
            writeln!(out, "Signed in as {}", session.user().display_name())?;
        }
        Commands::Logout => {
            store.log_out()?;
            writeln!(out, "Signed out")?;
        }
        Commands::Strength { password } => {
            let strength = PasswordStrength::of(&password);
            writeln!(out, "{} ({}%)", strength.label(), strength.percent())?;
        }
        command => {
            let mut session = store.resume().context("Log in first")?;
            if let Some(project) = project {
                session.select_project(project);
            }
            run_signed_in(store, &mut session, command, out)?;
        }
    }
    Ok(())
}

fn run_signed_in<S: KeyValueStore, W: Write>(
    store: &mut AggregateStore<S>,
    session: &mut Session,
    command: Commands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Whoami => {
            let user = session.user();
            writeln!(out, "{} <{}>", user.display_name(), user.email)?;
            writeln!(out, "Role: {}", user.role_label())?;
            if !user.company.is_empty() {
                writeln!(out, "Company: {}", user.company)?;
            }
            if !user.job_title.is_empty() {
                writeln!(out, "Job title: {}", user.job_title)?;
            }
        }
        Commands::Profile(args) => {
            let input = profile_input(session, args);
            store.save_profile(session, input)?;
            writeln!(out, "Profile saved")?;
        }
        Commands::Password {
            current,
            new,
            confirm,
        } => {
            store.change_password(session, &current, &new, &confirm)?;
            writeln!(out, "Password updated")?;
        }
        Commands::Project { command } => run_project(store, session, command, out)?,
        Commands::Task { command } => run_task(store, session, command, out)?,
        Commands::Member { command } => match command {
            MemberCommands::Add {
                first_name,
                last_name,
                email,
                role,
            } => {
                let change = store.create_member(
                    session,
                    MemberInput::new(first_name, last_name, email).with_role(role),
                )?;
                report(out, &change)?;
                writeln!(out, "{}", change.entity.id)?;
            }
            MemberCommands::List => {
                for entry in store.member_stats(session) {
                    writeln!(
                        out,
                        "{:<4} {:<24} {:<16} {}/{} done",
                        entry.member.initials,
                        entry.member.name,
                        entry.member.id,
                        entry.done,
                        entry.assigned
                    )?;
                }
            }
        },
        Commands::Stats => {
            let numbers = store.dashboard_stats(session);
            let projects = store.projects(session);
            writeln!(out, "Active projects:   {}", numbers.active_projects)?;
            writeln!(
                out,
                "Tasks done:        {}/{} ({}%)",
                numbers.done_tasks, numbers.total_tasks, numbers.completion_rate
            )?;
            writeln!(out, "New this month:    {}", numbers.projects_this_month)?;
            writeln!(out, "Productivity:      {}", numbers.productivity_score)?;
            writeln!(out, "Unread:            {}", numbers.unread_notifications)?;
            for (status, count) in stats::status_breakdown(&projects) {
                writeln!(out, "  {:<10} {count}", status.as_str())?;
            }
            for (priority, count) in stats::priority_breakdown(&projects) {
                writeln!(out, "  {:<10} {count}", priority.as_str())?;
            }
            let today = store.now().date_naive();
            for (day, count) in stats::completions_by_day(&projects, today) {
                writeln!(out, "  {} {count}", day.format("%a"))?;
            }
        }
        Commands::Deadlines { all } => {
            let projects = store.projects(session);
            let members = store.members(session);
            let list = if all {
                stats::deadlines(&projects)
            } else {
                stats::upcoming_deadlines(&projects)
            };
            if list.is_empty() {
                writeln!(out, "No upcoming deadlines")?;
            }
            for deadline in list {
                writeln!(
                    out,
                    "{}  {}  [{}]  {}",
                    deadline.due,
                    deadline.task.title,
                    deadline.project_name,
                    stats::member_name(
                        session.user(),
                        &members,
                        deadline.task.assignee.as_deref()
                    )
                )?;
            }
        }
        Commands::Calendar { year, month } => {
            let projects = store.projects(session);
            let days = stats::deadline_days(&projects, year, month);
            let today = store.now().date_naive();
            let days: Vec<String> = days
                .into_iter()
                .map(|d| {
                    if today.year() == year && today.month() == month && today.day() == d {
                        format!("[{d}]")
                    } else {
                        d.to_string()
                    }
                })
                .collect();
            writeln!(out, "{year}-{month:02}: {}", days.join(" "))?;
        }
        Commands::Activity => {
            let now = store.now();
            for entry in store.activities(session) {
                writeln!(out, "{:<10} {entry}", time_ago(entry.time, now))?;
            }
        }
        Commands::Documents => {
            let projects = store.projects(session);
            for file in stats::documents(&projects) {
                writeln!(out, "{:<32} {:>8}  {}", file.name, file.display_size(), file.mime_type)?;
            }
        }
        Commands::Notifications { command } => match command {
            NotificationCommands::List => {
                let now = store.now();
                let notifications = store.notifications(session);
                for n in stats::recent_notifications(&notifications) {
                    let marker = if n.read { " " } else { "*" };
                    writeln!(
                        out,
                        "{marker} {:<10} {}: {}",
                        time_ago(n.time, now),
                        n.title,
                        n.text
                    )?;
                }
            }
            NotificationCommands::Read => {
                let count = store.mark_all_read(session)?;
                writeln!(out, "Marked {count} read")?;
            }
            NotificationCommands::Clear => {
                store.clear_notifications(session)?;
                writeln!(out, "Notifications cleared")?;
            }
        },
        Commands::Export { output } => {
            let snapshot = store.export(session);
            let json = snapshot.to_json_pretty()?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Exported to {}", path.display())?;
                }
                None => writeln!(out, "{json}")?,
            }
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear data without --yes");
            }
            store.clear_all_data(session)?;
            writeln!(out, "All data cleared")?;
        }
        other @ (Commands::Signup { .. }
        | Commands::Login { .. }
        | Commands::Logout
        | Commands::Strength { .. }) => bail!("{other:?} runs without a session"),
    }
    Ok(())
}

fn run_project<S: KeyValueStore, W: Write>(
    store: &mut AggregateStore<S>,
    session: &mut Session,
    command: ProjectCommands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        ProjectCommands::Add(args) => {
            let change = store.create_project(session, project_input(args))?;
            report(out, &change)?;
            writeln!(out, "{}", change.entity.id)?;
        }
        ProjectCommands::Update { id, fields } => {
            let outcome = store.update_project(session, &id, project_input(fields))?;
            report_outcome(out, &outcome, "Project", &id)?;
        }
        ProjectCommands::Delete => {
            let id = session.current_project().unwrap_or_default().to_string();
            let outcome = store.delete_project(session)?;
            report_outcome(out, &outcome, "Project", &id)?;
        }
        ProjectCommands::List { status, query } => {
            let projects = store.projects(session);
            let filtered = stats::filter_projects(&projects, status);
            let shown: Vec<&Project> = match query.as_deref() {
                Some(query) => {
                    let matches = stats::search_projects(&projects, query);
                    filtered
                        .into_iter()
                        .filter(|p| matches.iter().any(|m| m.id == p.id))
                        .collect()
                }
                None => filtered,
            };
            if shown.is_empty() {
                writeln!(out, "No projects found")?;
            }
            for p in shown {
                writeln!(
                    out,
                    "{:<14} {:<10} {:>3}%  {}",
                    p.id,
                    p.status.as_str(),
                    stats::project_completion(p),
                    p.name
                )?;
            }
        }
        ProjectCommands::Show { id } => {
            let project = store
                .project(session, &id)
                .with_context(|| format!("Project not found: {id}"))?;
            let members = store.members(session);
            writeln!(out, "{} ({})", project.name, project.status.as_str())?;
            if !project.description.is_empty() {
                writeln!(out, "{}", project.description)?;
            }
            if let Some(deadline) = project.deadline {
                writeln!(out, "Deadline: {deadline}")?;
            }
            writeln!(
                out,
                "Progress: {}/{} ({}%)",
                project.done_count(),
                project.tasks.len(),
                stats::project_completion(&project)
            )?;
            for task in &project.tasks {
                writeln!(
                    out,
                    "  [{}] {:<14} {:<6} {:<3} {}{}",
                    if task.done { "x" } else { " " },
                    task.id,
                    task.priority.as_str(),
                    stats::member_initials(session.user(), &members, task.assignee.as_deref()),
                    task.title,
                    task.due.map(|d| format!(" (due {d})")).unwrap_or_default()
                )?;
            }
        }
    }
    Ok(())
}

fn run_task<S: KeyValueStore, W: Write>(
    store: &mut AggregateStore<S>,
    session: &mut Session,
    command: TaskCommands,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        TaskCommands::Add(args) => {
            stage_files(session, &args.files)?;
            let change = store.create_task(session, task_input(args))?;
            session.clear_staged_files();
            report(out, &change)?;
            writeln!(out, "{}", change.entity.id)?;
        }
        TaskCommands::Update {
            id,
            fields,
            replace_files,
        } => {
            if !replace_files {
                let existing = session
                    .current_project()
                    .and_then(|p| store.project(session, p))
                    .and_then(|p| p.task(&id).cloned());
                if let Some(task) = existing {
                    session.stage_files_from(&task);
                }
            }
            stage_files(session, &fields.files)?;
            let outcome = store.update_task(session, &id, task_input(fields))?;
            session.clear_staged_files();
            report_outcome(out, &outcome, "Task", &id)?;
        }
        TaskCommands::Delete { id } => {
            let outcome = store.delete_task(session, &id)?;
            report_outcome(out, &outcome, "Task", &id)?;
        }
        TaskCommands::Toggle { id } => {
            let outcome = store.toggle_task(session, &id)?;
            match outcome.change() {
                Some(change) if !change.entity.done => {
                    writeln!(out, "Reopened task: {}", change.entity.title)?
                }
                _ => report_outcome(out, &outcome, "Task", &id)?,
            }
        }
    }
    Ok(())
}

fn project_input(args: ProjectArgs) -> ProjectInput {
    let mut input = ProjectInput::new(args.name)
        .with_description(args.description)
        .with_status(args.status);
    input.deadline = args.deadline;
    input
}

fn task_input(args: TaskArgs) -> TaskInput {
    TaskInput {
        title: args.title,
        description: args.description,
        priority: args.priority,
        due: args.due,
        assignee: args.assignee,
    }
}

fn profile_input(session: &Session, args: ProfileArgs) -> ProfileInput {
    let current = ProfileInput::from_user(session.user());
    ProfileInput {
        first_name: args.first_name.unwrap_or(current.first_name),
        last_name: args.last_name.unwrap_or(current.last_name),
        company: args.company.unwrap_or(current.company),
        role: args.role.unwrap_or(current.role),
        job_title: args.job_title.unwrap_or(current.job_title),
        bio: args.bio.unwrap_or(current.bio),
    }
}

fn stage_files(session: &mut Session, paths: &[PathBuf]) -> anyhow::Result<()> {
    for path in paths {
        session.stage_file(read_attachment(path)?)?;
    }
    Ok(())
}

/// Reads a file from disk into an attachment with a base64 data URL payload.
///
/// Files over the attachment limit are rejected before their contents are read.
pub fn read_attachment(path: &Path) -> anyhow::Result<FileAttachment> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    if size > MAX_ATTACHMENT_BYTES {
        bail!("{name} exceeds 10MB limit");
    }

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    let data = format!("data:{mime_type};base64,{}", STANDARD.encode(&bytes));
    Ok(FileAttachment::new(
        name,
        bytes.len() as u64,
        mime_type.essence_str(),
        data,
    ))
}

fn report<T, W: Write>(out: &mut W, change: &Change<T>) -> anyhow::Result<()> {
    if let Some(activity) = &change.activity {
        writeln!(out, "{}", activity.text)?;
    }
    if let Some(notification) = &change.notification {
        tracing::debug!(title = %notification.title, "Notification emitted");
    }
    Ok(())
}

fn report_outcome<T, W: Write>(
    out: &mut W,
    outcome: &MutationOutcome<T>,
    entity_type: &str,
    id: &str,
) -> anyhow::Result<()> {
    match outcome {
        MutationOutcome::Applied(change) => report(out, change),
        MutationOutcome::NotFound => {
            writeln!(out, "{entity_type} not found: {id} (nothing changed)")?;
            Ok(())
        }
    }
}
