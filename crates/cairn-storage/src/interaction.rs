//! Episodic interaction records
//!
//! One durable record per appended message or handoff event. Records are
//! read by content and index, never by sequence, so each insert is
//! independently atomic.

use cairn_core::{Message, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an episodic interaction
///
/// Always store-generated; client-supplied ids are never trusted, which
/// keeps ids collision-free when the store is shared by multiple
/// process instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractionId(String);

impl InteractionId {
    /// Create a new unique interaction ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The placeholder used before the store assigns an id
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Whether the store still needs to assign this id
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an interaction concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Interaction completed normally
    Success,
    /// Escalated to a human
    Escalation,
    /// Abandoned or cut short
    Incomplete,
    /// Transferred between bots
    Handoff,
}

impl Outcome {
    /// Get the wire label for this outcome
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Escalation => "escalation",
            Self::Incomplete => "incomplete",
            Self::Handoff => "handoff",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A durable record of one conversational interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodicInteraction {
    /// Store-generated identifier (unassigned until stored)
    #[serde(default)]
    pub id: InteractionId,
    /// The conversation this interaction belongs to
    pub conversation_id: String,
    /// The message as appended to working memory
    pub message: Message,
    /// Record timestamp (defaults to the message timestamp)
    pub timestamp: Timestamp,
    /// Derived summary string, used for search matching
    pub summary: String,
    /// How the interaction concluded
    pub outcome: Outcome,
    /// Advisory score from the most recent search that surfaced this
    /// record. Recomputed fresh on every query; never authoritative.
    #[serde(default)]
    pub relevance_score: f32,
    /// Heuristically extracted entities (addresses, amounts, names)
    #[serde(default)]
    pub related_entities: Vec<String>,
    /// Domain keywords extracted from the message
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl EpisodicInteraction {
    /// Create a new record for a message, with the id left for the
    /// store to assign and the timestamp taken from the message.
    pub fn new(
        conversation_id: impl Into<String>,
        message: Message,
        summary: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        let timestamp = message.timestamp;
        Self {
            id: InteractionId::unassigned(),
            conversation_id: conversation_id.into(),
            message,
            timestamp,
            summary: summary.into(),
            outcome,
            relevance_score: 0.0,
            related_entities: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Attach extracted keywords
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Attach extracted entities
    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.related_entities = entities;
        self
    }

    /// Override the record timestamp (used by tests and backfills)
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Introspection counts for monitoring and tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of interactions currently stored
    pub interaction_count: u64,
    /// Timestamp of the oldest stored interaction
    pub oldest_timestamp: Option<Timestamp>,
    /// Timestamp of the newest stored interaction
    pub newest_timestamp: Option<Timestamp>,
}
