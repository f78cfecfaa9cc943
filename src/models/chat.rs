//! Chat transcript types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text shown when the backend answered without any usable reply
pub const EMPTY_REPLY_TEXT: &str = "Sorry, I couldn't get a response.";

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single transcript entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Body returned by the ask endpoint
///
/// The backend either answers `{"response": "..."}` or nests the text one
/// level deeper as `{"response": {"response": "..."}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskReply {
    #[serde(default)]
    pub response: Value,
}

impl AskReply {
    /// Resolve the reply text, preferring the nested form
    pub fn into_text(self) -> String {
        let nested = self
            .response
            .get("response")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if let Some(text) = nested {
            return text;
        }

        match self.response {
            Value::String(text) if !text.is_empty() => text,
            _ => EMPTY_REPLY_TEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> AskReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_flat_reply() {
        assert_eq!(reply(r#"{"response": "Save 20%"}"#).into_text(), "Save 20%");
    }

    #[test]
    fn test_nested_reply() {
        let text = reply(r#"{"response": {"response": "Pay the card first"}}"#).into_text();
        assert_eq!(text, "Pay the card first");
    }

    #[test]
    fn test_missing_or_empty_reply_falls_back() {
        assert_eq!(reply("{}").into_text(), EMPTY_REPLY_TEXT);
        assert_eq!(reply(r#"{"response": ""}"#).into_text(), EMPTY_REPLY_TEXT);
        assert_eq!(reply(r#"{"response": {"other": 1}}"#).into_text(), EMPTY_REPLY_TEXT);
        assert_eq!(reply(r#"{"response": 42}"#).into_text(), EMPTY_REPLY_TEXT);
    }

    #[test]
    fn test_sender_wire_names() {
        let msg = ChatMessage::ai("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"sender":"ai","text":"hello"}"#);
        assert!(!msg.is_user());
        assert!(ChatMessage::user("hi").is_user());
    }
}
