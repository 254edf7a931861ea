//! Conversation messages
//!
//! Messages are immutable once appended; ordering within a conversation is
//! insertion order, not necessarily timestamp order.

use crate::constants::MESSAGE_CONTENT_SIZE_BYTES_MAX;
use crate::time::{now, Timestamp};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The lead / end user
    User,
    /// The assistant's reply
    Assistant,
    /// Synthesized system events (e.g. bot handoffs)
    System,
}

impl Role {
    /// Get the wire label for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single conversation message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the message
    pub role: Role,
    /// The message text
    pub content: String,
    /// When the message was produced
    pub timestamp: Timestamp,
    /// Optional caller-attached metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Message {
    /// Create a new message with the current timestamp
    ///
    /// Content beyond MESSAGE_CONTENT_SIZE_BYTES_MAX is truncated at a
    /// char boundary; the append path never fails on input size.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        let mut content = content.into();

        if content.len() > MESSAGE_CONTENT_SIZE_BYTES_MAX {
            let mut end = MESSAGE_CONTENT_SIZE_BYTES_MAX;
            while !content.is_char_boundary(end) {
                end -= 1;
            }
            content.truncate(end);
        }

        Self {
            role,
            content,
            timestamp: now(),
            metadata: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Override the timestamp (used when replaying recorded history)
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("I want to sell my house");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "I want to sell my house");
        assert!(msg.metadata.is_none());
    }

    #[test]
    fn test_message_with_metadata() {
        let msg = Message::assistant("Happy to help")
            .with_metadata(serde_json::json!({"intent": "sell"}));
        assert_eq!(msg.metadata.unwrap()["intent"], "sell");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn test_message_content_truncated_to_cap() {
        let large = "x".repeat(MESSAGE_CONTENT_SIZE_BYTES_MAX + 100);
        let msg = Message::user(large);
        assert_eq!(msg.content.len(), MESSAGE_CONTENT_SIZE_BYTES_MAX);
    }

    #[test]
    fn test_message_truncation_respects_char_boundaries() {
        // 3 bytes per char; the cap is not a multiple of 3
        let large = "€".repeat(MESSAGE_CONTENT_SIZE_BYTES_MAX / 3 + 10);
        let msg = Message::user(large);
        assert!(msg.content.len() <= MESSAGE_CONTENT_SIZE_BYTES_MAX);
        assert!(msg.content.chars().all(|c| c == '€'));
    }

    #[test]
    fn test_message_serde_roundtrip() {
        let msg = Message::system("Handoff from qualifier to scheduler");
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
