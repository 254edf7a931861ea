//! Episodic store trait and search query types
//!
//! The contract is index-backed range queries and multi-entry indexes,
//! not any specific engine: an embedded KV store, a relational table,
//! or a document store can all implement it.

use crate::interaction::{EpisodicInteraction, InteractionId, Outcome, StoreStats};
use async_trait::async_trait;
use cairn_core::{
    Result, SEARCH_LIMIT_COUNT_DEFAULT, SEARCH_RELEVANCE_MIN_DEFAULT,
    SEARCH_TIME_WINDOW_HOURS_DEFAULT,
};
use serde::{Deserialize, Serialize};

/// A relevance-ranked search over stored interactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text to rank against (keywords, summary, entities)
    pub text: String,
    /// Maximum number of results
    pub limit: usize,
    /// Minimum relevance score for a hit
    pub relevance_min: f32,
    /// Restrict the scan to interactions newer than this many hours
    pub time_window_hours: Option<u64>,
    /// Restrict to a single conversation
    pub conversation_id: Option<String>,
    /// Restrict to a single outcome
    pub outcome: Option<Outcome>,
    /// Restrict to interactions mentioning any of these entities
    pub entity_filter: Option<Vec<String>>,
}

impl SearchQuery {
    /// Create a query with the subsystem defaults
    /// (limit 5, min relevance 0.7, 7-day window)
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: SEARCH_LIMIT_COUNT_DEFAULT,
            relevance_min: SEARCH_RELEVANCE_MIN_DEFAULT,
            time_window_hours: Some(SEARCH_TIME_WINDOW_HOURS_DEFAULT),
            conversation_id: None,
            outcome: None,
            entity_filter: None,
        }
    }

    /// Set result limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the minimum relevance score
    pub fn relevance_min(mut self, min: f32) -> Self {
        self.relevance_min = min;
        self
    }

    /// Restrict to interactions newer than this many hours
    pub fn time_window_hours(mut self, hours: u64) -> Self {
        self.time_window_hours = Some(hours);
        self
    }

    /// Scan the full store, without a time restriction
    pub fn unbounded(mut self) -> Self {
        self.time_window_hours = None;
        self
    }

    /// Restrict to a single conversation
    pub fn conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Restrict to a single outcome
    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Restrict to interactions mentioning any of these entities
    pub fn entity_filter(mut self, entities: Vec<String>) -> Self {
        self.entity_filter = Some(entities);
        self
    }
}

/// An interaction paired with its per-query relevance score
///
/// The score is computed fresh for the query that produced it and is
/// never written back into durable storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredInteraction {
    /// The matching record
    pub interaction: EpisodicInteraction,
    /// Relevance score for this query (0.0 - 1.0)
    pub score: f32,
}

impl ScoredInteraction {
    /// Pair a record with its score
    pub fn new(mut interaction: EpisodicInteraction, score: f32) -> Self {
        // Mirror the score onto the advisory field for display callers;
        // the stored record keeps whatever it had.
        interaction.relevance_score = score;
        Self { interaction, score }
    }
}

/// Durable, queryable record of interaction history
///
/// Implementations own their concurrency: the retention purge is a pure
/// range delete and must be safe against concurrent reads and writes.
#[async_trait]
pub trait EpisodicStore: Send + Sync {
    /// Insert an interaction, assigning a store-generated id (and the
    /// message timestamp) when absent. Returns the assigned id.
    async fn store(&self, interaction: EpisodicInteraction) -> Result<InteractionId>;

    /// Relevance-ranked search: score candidates fresh, drop those
    /// below `relevance_min`, sort descending, truncate to `limit`.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ScoredInteraction>>;

    /// Delete every interaction with `timestamp < cutoff`.
    /// Returns the number of records removed. Idempotent.
    async fn purge_older_than(&self, cutoff: cairn_core::Timestamp) -> Result<usize>;

    /// Introspection for monitoring and tests
    async fn statistics(&self) -> Result<StoreStats>;
}
