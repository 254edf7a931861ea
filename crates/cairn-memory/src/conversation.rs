//! Conversation state held in working memory

use cairn_core::{now, Message, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier for an active conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded transfer of a conversation between specialist bots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotHandoff {
    /// Bot that released the conversation
    pub from_bot: String,
    /// Bot that received the conversation
    pub to_bot: String,
    /// When the handoff happened
    pub timestamp: Timestamp,
    /// Context the releasing bot chose to pass along
    #[serde(default)]
    pub transferred_context: Option<serde_json::Value>,
}

impl BotHandoff {
    pub fn new(from_bot: impl Into<String>, to_bot: impl Into<String>) -> Self {
        Self {
            from_bot: from_bot.into(),
            to_bot: to_bot.into(),
            timestamp: now(),
            transferred_context: None,
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.transferred_context = Some(context);
        self
    }
}

/// Structured per-conversation metadata alongside the transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMetadata {
    /// Opaque lead/customer context carried by the caller
    #[serde(default)]
    pub lead_context: Option<serde_json::Value>,
    /// Most recent intent classification scores
    #[serde(default)]
    pub intent_scores: Option<HashMap<String, f32>>,
    /// Handoff history, oldest first
    #[serde(default)]
    pub handoffs: Vec<BotHandoff>,
}

/// Partial metadata update. Fields left `None` are untouched; handoffs
/// always append rather than replace.
#[derive(Debug, Clone, Default)]
pub struct MetadataPatch {
    pub lead_context: Option<serde_json::Value>,
    pub intent_scores: Option<HashMap<String, f32>>,
    pub handoffs: Vec<BotHandoff>,
}

impl MetadataPatch {
    pub fn lead_context(mut self, context: serde_json::Value) -> Self {
        self.lead_context = Some(context);
        self
    }

    pub fn intent_scores(mut self, scores: HashMap<String, f32>) -> Self {
        self.intent_scores = Some(scores);
        self
    }

    pub fn handoff(mut self, handoff: BotHandoff) -> Self {
        self.handoffs.push(handoff);
        self
    }
}

impl ConversationMetadata {
    /// Apply a patch, last write wins per field; handoffs append
    pub fn apply(&mut self, patch: MetadataPatch) {
        if let Some(context) = patch.lead_context {
            self.lead_context = Some(context);
        }
        if let Some(scores) = patch.intent_scores {
            self.intent_scores = Some(scores);
        }
        self.handoffs.extend(patch.handoffs);
    }
}

/// The full in-memory state of one active conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub id: ConversationId,
    /// Transcript in append order
    pub messages: Vec<Message>,
    pub started_at: Timestamp,
    /// Bumped on every append and metadata update; drives eviction
    pub last_activity: Timestamp,
    pub metadata: ConversationMetadata,
}

impl ConversationContext {
    pub fn new(id: ConversationId) -> Self {
        let ts = now();
        Self {
            id,
            messages: Vec::new(),
            started_at: ts,
            last_activity: ts,
            metadata: ConversationMetadata::default(),
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
