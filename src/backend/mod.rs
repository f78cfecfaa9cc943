//! Credalysis Backend
//!
//! The REST surface every page talks to. Pages only see the
//! [`FinanceBackend`] trait; [`BackendClient`] implements it over reqwest for
//! native builds and the browser frontend implements the same routes with
//! its own fetch client.
//!
//! ## Routes
//!
//! - `POST /user/ask-ai`: free-text question to the AI assistant
//! - `GET|POST|PUT|DELETE /users/goals...`: goal CRUD
//! - `GET /users/goals/agent/{review,advice,scenario}/{email}`: goal assistant
//! - `GET /user/loans/{email}`: loan listing

#[cfg(feature = "native")]
mod client;
pub mod routes;

#[cfg(feature = "native")]
pub use client::{BackendClient, BackendConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AgentReply, Goal, GoalPayload, Identity, Loan};

/// Remote operations the pages depend on
#[async_trait]
pub trait FinanceBackend: Send + Sync {
    /// Ask the AI assistant; returns the resolved reply text
    async fn ask(&self, identity: &Identity, query: &str) -> Result<String, BackendError>;

    /// Fetch every goal of the user
    async fn list_goals(&self, identity: &Identity) -> Result<Vec<Goal>, BackendError>;

    /// Create a goal from a fully populated payload
    async fn create_goal(&self, payload: &GoalPayload) -> Result<(), BackendError>;

    /// Update the goal stored under `goal_name`
    async fn update_goal(
        &self,
        identity: &Identity,
        goal_name: &str,
        payload: &GoalPayload,
    ) -> Result<(), BackendError>;

    /// Delete the goal stored under `goal_name`
    async fn delete_goal(&self, identity: &Identity, goal_name: &str) -> Result<(), BackendError>;

    /// Ask a (possibly empty) question about the user's goals
    async fn goal_review(&self, identity: &Identity, question: &str)
        -> Result<AgentReply, BackendError>;

    /// Get general advice about the user's goals
    async fn goal_advice(&self, identity: &Identity) -> Result<AgentReply, BackendError>;

    /// Analyze a what-if scenario against the user's goals
    async fn goal_scenario(
        &self,
        identity: &Identity,
        description: &str,
    ) -> Result<AgentReply, BackendError>;

    /// Fetch the user's loans
    async fn list_loans(&self, identity: &Identity) -> Result<Vec<Loan>, BackendError>;
}

/// Body of the ask request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub email: String,
    pub query: String,
}

/// Error body the backend sends with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// The `detail` text, if the body carried a usable one
    pub fn into_message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Errors that can occur when talking to the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP error! status: {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Text shown to the user, e.g. in an error transcript entry
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = BackendError::Status {
            status: 404,
            detail: Some("User not found".into()),
        };
        assert_eq!(err.user_message(), "User not found");

        let err = BackendError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), "HTTP error! status: 500");
    }

    #[test]
    fn test_error_detail() {
        let body: ErrorDetail = serde_json::from_str(r#"{"detail": "Bad email"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Bad email"));

        let body: ErrorDetail = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert_eq!(body.into_message(), None);

        let body: ErrorDetail =
            serde_json::from_str(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert!(body.into_message().unwrap().contains("field required"));
    }
}
