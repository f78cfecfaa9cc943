//! Data model shared by the CLI and the browser frontend
//!
//! - `Identity`: the opaque user identity every backend call is scoped to
//! - `ChatMessage`: one entry of the AI chat transcript
//! - `Goal` / `GoalDraft` / `GoalPayload`: financial goals and their forms
//! - `AgentResponse`: the reply of one of the three goal assistant actions
//! - `Loan` / `LoanStatus`: read-only loan listing

mod agent;
mod chat;
mod goal;
mod loan;

pub use agent::{AgentReply, AgentResponse, AssistantAction};
pub use chat::{AskReply, ChatMessage, Sender, EMPTY_REPLY_TEXT};
pub use goal::{decode_goals, progress_percent, Goal, GoalDraft, GoalPayload, ProgressBand, PRIORITIES};
pub use loan::{decode_loans, Loan, LoanStatus};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Storage key the identity is kept under on the client
pub const IDENTITY_KEY: &str = "email";
/// Storage key of the signed-in flag (`"true"` when signed in)
pub const AUTH_KEY: &str = "auth";
/// Storage key of the access role
pub const ACCESS_KEY: &str = "access";
/// Access role allowed on the user pages
pub const USER_ACCESS: &str = "user";

/// Check that a stored session belongs to a signed-in user
pub fn check_access(auth: bool, access: Option<&str>) -> Result<(), AppError> {
    if auth && access == Some(USER_ACCESS) {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

/// The user identity (an email address) that scopes all backend queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a stored identity, rejecting blank values
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
