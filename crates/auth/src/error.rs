//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A required field was left empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// New password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password shorter than the minimum length.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Email/password pair did not verify.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Current password did not verify during a change.
    #[error("Current password is incorrect")]
    IncorrectPassword,

    /// An account already uses this email.
    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    /// A stored credential could not be parsed.
    #[error("Malformed credential")]
    MalformedCredential,

    /// The password hasher rejected its input.
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    /// Stored session is missing or expired.
    #[error("Not signed in")]
    NotSignedIn,
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
