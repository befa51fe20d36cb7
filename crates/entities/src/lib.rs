//! Core entity definitions for ProjectHub.
//!
//! This crate defines the data types persisted for a single user: projects
//! and the tasks they own, file attachments, team members, and the activity
//! and notification logs.

mod activity;
mod attachment;
mod dates;
mod member;
mod notification;
mod project;
mod task;
mod user;

pub use activity::*;
pub use attachment::*;
pub use member::*;
pub use notification::*;
pub use project::*;
pub use task::*;
pub use user::*;
