//! Project, task and team storage for ProjectHub
//!
//! This crate is the aggregate store behind the dashboard. It keeps each
//! user's projects, tasks, team members, activity log and notifications in a
//! key-value store partitioned by email, applies mutations with their logging
//! side effects, and derives statistics on demand.
//!
//! Every mutation takes an explicit [`Session`] naming the acting user, the
//! selected project and the files staged for the next task save.

mod accounts;
mod clock;
mod error;
mod export;
pub mod keys;
mod kv;
mod mutation;
mod repository;
mod session;
pub mod stats;
mod store;

pub use accounts::*;
pub use clock::*;
pub use error::*;
pub use export::*;
pub use kv::*;
pub use mutation::*;
pub use repository::*;
pub use session::*;
pub use store::*;
