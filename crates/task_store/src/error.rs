//! Task store error types.

use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Input rejected before any state was touched.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Duplicate entity.
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },

    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The operation needs a current project and none is selected.
    #[error("No project selected")]
    NoProjectSelected,

    /// Underlying key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Account or credential error.
    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl TaskStoreError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true for rejected input: missing fields or duplicate keys.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AlreadyExists { .. })
    }
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
