//! Workflow error taxonomy.
//!
//! Every workflow operation fails with exactly one of these variants. The
//! database layer maps store failures into [`WorkflowError::Persistence`].

use thiserror::Error;

use crate::auth::PasswordError;

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Input rejected before any I/O.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The actor is not allowed to perform the operation.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Logical entity name.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The operation is not legal in the entity's current state.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Zero rows affected or the store reported a failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl WorkflowError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for an illegal state error.
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Shorthand for a not found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Permission(_) => 403,
            Self::NotFound { .. } => 404,
            Self::IllegalState(_) => 409,
            Self::Persistence(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Permission(_) => "PERMISSION_DENIED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::IllegalState(_) => "ILLEGAL_STATE",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl From<PasswordError> for WorkflowError {
    fn from(err: PasswordError) -> Self {
        Self::Persistence(err.to_string())
    }
}
