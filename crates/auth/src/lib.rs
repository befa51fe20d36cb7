//! Authentication helpers for ProjectHub.
//!
//! This crate provides:
//! - Argon2id password credentials
//! - Password rules and strength scoring
//! - Login session records and their expiry

mod error;
mod password;
mod session;
mod strength;

pub use error::*;
pub use password::*;
pub use session::*;
pub use strength::*;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hours a session stays valid when "remember me" is not set.
pub const SESSION_TTL_HOURS: i64 = 24;
