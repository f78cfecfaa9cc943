//! AI Chat Session
//!
//! The Ask AI page: a session-local transcript of user questions and
//! assistant replies.
//!
//! A query is split in two halves so the user entry shows up before the
//! backend answers:
//!
//! 1. [`ChatSession::begin`] appends the user entry, clears the input and
//!    hands out a [`PendingQuery`]
//! 2. [`ChatSession::complete`] consumes that token and appends exactly one
//!    assistant entry, either the reply or an `Error: ...` line
//!
//! Several queries may be in flight at once; their replies are appended in
//! completion order.

use thiserror::Error;

use crate::backend::{BackendError, FinanceBackend};
use crate::models::{ChatMessage, Identity};

/// Reasons a query is not sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Blank input; ignored without notifying the user
    #[error("Empty query")]
    EmptyInput,

    #[error("User email not found. Please log in again.")]
    MissingIdentity,
}

impl ChatError {
    /// Whether the user should be told about this rejection
    pub fn is_silent(&self) -> bool {
        matches!(self, ChatError::EmptyInput)
    }
}

/// Append-only list of chat entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }
}

/// A query whose user entry is already in the transcript
///
/// Must be handed back to [`ChatSession::complete`] exactly once.
#[derive(Debug)]
#[must_use = "a pending query must be completed"]
pub struct PendingQuery {
    identity: Identity,
    query: String,
}

impl PendingQuery {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// State of the Ask AI page
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    identity: Option<Identity>,
    input: String,
    transcript: Transcript,
    in_flight: usize,
}

impl ChatSession {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity,
            ..Default::default()
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Number of queries begun but not yet completed
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Append the user entry for the current input and clear it
    ///
    /// A missing identity is reported even for blank input.
    pub fn begin(&mut self) -> Result<PendingQuery, ChatError> {
        let identity = self.identity.clone().ok_or(ChatError::MissingIdentity)?;
        if self.input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let query = std::mem::take(&mut self.input);
        self.transcript.push(ChatMessage::user(query.clone()));
        self.in_flight += 1;

        Ok(PendingQuery { identity, query })
    }

    /// Append the assistant entry answering `pending`
    pub fn complete(
        &mut self,
        pending: PendingQuery,
        result: Result<String, BackendError>,
    ) -> &ChatMessage {
        self.in_flight = self.in_flight.saturating_sub(1);

        let text = match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(query = %pending.query, error = %e, "Error asking AI");
                format!("Error: {}", e.user_message())
            }
        };
        self.transcript.push(ChatMessage::ai(text))
    }

    /// Send the current input and wait for the reply
    pub async fn submit(
        &mut self,
        backend: &dyn FinanceBackend,
    ) -> Result<&ChatMessage, ChatError> {
        let pending = self.begin()?;
        let result = backend.ask(pending.identity(), pending.query()).await;
        Ok(self.complete(pending, result))
    }
}
