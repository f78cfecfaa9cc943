//! Application Error Types
//!
//! Every failure a page can hit collapses into one user-facing alert:
//! transport and malformed-response failures from the backend, validation
//! failures from the forms, and a missing identity.

use thiserror::Error;

use crate::backend::BackendError;

/// Page-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Form input rejected before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// No identity in client storage
    #[error("User email not found. Please log in again.")]
    MissingIdentity,

    /// The session is not an authenticated user session
    #[error("Access denied. Please login.")]
    AccessDenied,

    /// Edit requested for a goal that is not in the list
    #[error("No goal at position {0}")]
    GoalNotFound(usize),

    /// A backend call failed; `context` is what the user is told
    #[error("{context}: {source}")]
    Backend {
        context: &'static str,
        source: BackendError,
    },
}

impl AppError {
    pub fn backend(context: &'static str, source: BackendError) -> Self {
        AppError::Backend { context, source }
    }

    /// The single notification shown to the user for this failure
    pub fn alert_message(&self) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::Backend { context, .. } => context.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for page operations
pub type AppResult<T> = Result<T, AppError>;
