//! CLI argument definitions for ProjectHub.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use entities::{ProjectStatus, TaskPriority};

/// ProjectHub - projects, tasks and team from the terminal.
///
/// Sign up or log in first; every other command acts as the stored session.
#[derive(Parser, Debug)]
#[command(name = "projecthub")]
#[command(author, version, about = "Manage projects, tasks and team members", long_about = None)]
pub struct Cli {
    /// Directory holding the data files
    #[arg(long = "data-dir", global = true, env = "PROJECTHUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Selected project for task and project-delete commands
    #[arg(short = 'p', long = "project", global = true)]
    pub project: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "PROJECTHUB_PASSWORD", hide_env_values = true)]
        password: String,

        /// Defaults to the password
        #[arg(long)]
        confirm: Option<String>,

        #[arg(long, default_value = "")]
        company: String,

        #[arg(long, default_value = "")]
        role: String,
    },

    /// Sign in
    Login {
        email: String,

        #[arg(long, env = "PROJECTHUB_PASSWORD", hide_env_values = true)]
        password: String,

        /// Keep the session until logout
        #[arg(long)]
        remember: bool,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Update profile fields; omitted fields keep their value
    Profile(ProfileArgs),

    /// Change the account password
    Password {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,

        #[arg(long)]
        confirm: String,
    },

    /// Score a candidate password
    Strength { password: String },

    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Task management commands (need --project)
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Team management commands
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// Dashboard numbers and breakdowns
    Stats,

    /// Open tasks ordered by due date
    Deadlines {
        /// Show every open deadline instead of the next five
        #[arg(long)]
        all: bool,
    },

    /// Days of a month with open tasks due
    Calendar {
        year: i32,

        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Recent activity
    Activity,

    /// Every file attached to a task
    Documents,

    /// Notification commands
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Write all data as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete all projects, team members and logs of the account
    Clear {
        /// Required to confirm
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub job_title: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Add(ProjectArgs),

    /// Replace the fields of a project
    Update {
        id: String,

        #[command(flatten)]
        fields: ProjectArgs,
    },

    /// Delete the selected project and its tasks
    Delete,

    /// List projects
    List {
        /// Filter by status (active, pending, completed)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<ProjectStatus>,

        /// Case-insensitive match on name or description
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show a project with its tasks
    Show { id: String },
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    pub name: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    #[arg(short, long, value_parser = parse_status, default_value = "active")]
    pub status: ProjectStatus,

    /// Deadline (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub deadline: Option<NaiveDate>,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to the selected project
    Add(TaskArgs),

    /// Replace the fields of a task
    Update {
        id: String,

        #[command(flatten)]
        fields: TaskArgs,

        /// Drop the task's current attachments instead of keeping them
        #[arg(long)]
        replace_files: bool,
    },

    /// Delete a task
    Delete { id: String },

    /// Flip a task between open and done
    Toggle { id: String },
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    pub title: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    #[arg(long, value_parser = parse_priority, default_value = "medium")]
    pub priority: TaskPriority,

    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub due: Option<NaiveDate>,

    /// Member id, or "me"
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Files to attach
    #[arg(short = 'f', long = "file")]
    pub files: Vec<PathBuf>,
}

/// Member subcommands
#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a team member
    Add {
        first_name: String,

        last_name: String,

        email: String,

        #[arg(short, long, default_value = "")]
        role: String,
    },

    /// List members with their task counts
    List,
}

/// Notification subcommands
#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// Show recent notifications
    List,

    /// Mark every notification read
    Read,

    /// Delete every notification
    Clear,
}

fn parse_status(s: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(s).ok_or_else(|| format!("unknown status: {s}"))
}

fn parse_priority(s: &str) -> Result<TaskPriority, String> {
    TaskPriority::parse(s).ok_or_else(|| format!("unknown priority: {s}"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date {s}: {e}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_task_add_args() {
        let cli = Cli::try_parse_from([
            "projecthub",
            "--project",
            "42",
            "task",
            "add",
            "Design",
            "--priority",
            "high",
            "--due",
            "2024-04-01",
            "-f",
            "brief.pdf",
        ])
        .unwrap();

        assert_eq!(cli.project.as_deref(), Some("42"));
        let Commands::Task {
            command: TaskCommands::Add(args),
        } = cli.command
        else {
            panic!("expected task add");
        };
        assert_eq!(args.title, "Design");
        assert_eq!(args.priority, TaskPriority::High);
        assert_eq!(args.due, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(args.files, vec![PathBuf::from("brief.pdf")]);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["projecthub", "project", "add", "X", "-s", "paused"]).is_err());
        assert!(Cli::try_parse_from(["projecthub", "calendar", "2024", "13"]).is_err());
        assert!(
            Cli::try_parse_from(["projecthub", "task", "add", "X", "--due", "01/04/2024"]).is_err()
        );
    }
}
