//! In-memory indexed episodic store
//!
//! The reference engine: append-only records behind a `tokio` RwLock,
//! with the secondary indexes the store contract requires — a
//! range-queryable timestamp index, equality indexes on conversation id
//! and outcome, and multi-entry indexes on keywords and related
//! entities. Also the engine used by tests and single-process
//! deployments.

use crate::interaction::{EpisodicInteraction, InteractionId, Outcome, StoreStats};
use crate::score::{relevance_score, QueryTerms};
use crate::store::{EpisodicStore, ScoredInteraction, SearchQuery};
use async_trait::async_trait;
use cairn_core::{now, Result, Timestamp};
use chrono::Duration;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
struct Indexes {
    /// Primary records by id
    records: HashMap<InteractionId, EpisodicInteraction>,
    /// Range-queryable timestamp index
    by_time: BTreeMap<(Timestamp, InteractionId), ()>,
    /// Equality index on conversation id
    by_conversation: HashMap<String, HashSet<InteractionId>>,
    /// Equality index on outcome
    by_outcome: HashMap<Outcome, HashSet<InteractionId>>,
    /// Multi-entry index on lowercased keywords
    by_keyword: HashMap<String, HashSet<InteractionId>>,
    /// Multi-entry index on lowercased entities
    by_entity: HashMap<String, HashSet<InteractionId>>,
}

impl Indexes {
    fn insert(&mut self, interaction: EpisodicInteraction) {
        let id = interaction.id.clone();

        self.by_time.insert((interaction.timestamp, id.clone()), ());
        self.by_conversation
            .entry(interaction.conversation_id.clone())
            .or_default()
            .insert(id.clone());
        self.by_outcome
            .entry(interaction.outcome)
            .or_default()
            .insert(id.clone());
        for keyword in &interaction.keywords {
            self.by_keyword
                .entry(keyword.to_lowercase())
                .or_default()
                .insert(id.clone());
        }
        for entity in &interaction.related_entities {
            self.by_entity
                .entry(entity.to_lowercase())
                .or_default()
                .insert(id.clone());
        }

        self.records.insert(id, interaction);
    }

    fn remove(&mut self, id: &InteractionId) -> Option<EpisodicInteraction> {
        let interaction = self.records.remove(id)?;

        self.by_time.remove(&(interaction.timestamp, id.clone()));
        prune_set(&mut self.by_conversation, &interaction.conversation_id, id);
        if let Some(set) = self.by_outcome.get_mut(&interaction.outcome) {
            set.remove(id);
            if set.is_empty() {
                self.by_outcome.remove(&interaction.outcome);
            }
        }
        for keyword in &interaction.keywords {
            prune_set(&mut self.by_keyword, &keyword.to_lowercase(), id);
        }
        for entity in &interaction.related_entities {
            prune_set(&mut self.by_entity, &entity.to_lowercase(), id);
        }

        Some(interaction)
    }

    /// Candidate ids for a query, narrowed through whichever indexes
    /// the query names before any scoring happens.
    fn candidates(&self, query: &SearchQuery, cutoff: Option<Timestamp>) -> Vec<InteractionId> {
        let in_window: Vec<InteractionId> = match cutoff {
            Some(cutoff) => self
                .by_time
                .range((cutoff, InteractionId::unassigned())..)
                .map(|((_, id), _)| id.clone())
                .collect(),
            None => self.by_time.keys().map(|(_, id)| id.clone()).collect(),
        };

        let conversation_set = query
            .conversation_id
            .as_ref()
            .map(|c| self.by_conversation.get(c).cloned().unwrap_or_default());
        let outcome_set = query
            .outcome
            .map(|o| self.by_outcome.get(&o).cloned().unwrap_or_default());
        let entity_set = query.entity_filter.as_ref().map(|entities| {
            let mut ids = HashSet::new();
            for entity in entities {
                if let Some(set) = self.by_entity.get(&entity.to_lowercase()) {
                    ids.extend(set.iter().cloned());
                }
            }
            ids
        });

        in_window
            .into_iter()
            .filter(|id| {
                conversation_set.as_ref().map_or(true, |s| s.contains(id))
                    && outcome_set.as_ref().map_or(true, |s| s.contains(id))
                    && entity_set.as_ref().map_or(true, |s| s.contains(id))
            })
            .collect()
    }
}

fn prune_set(
    index: &mut HashMap<String, HashSet<InteractionId>>,
    key: &str,
    id: &InteractionId,
) {
    if let Some(set) = index.get_mut(key) {
        set.remove(id);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

/// In-memory indexed episodic store
#[derive(Clone, Default)]
pub struct IndexedMemoryStore {
    inner: Arc<RwLock<Indexes>>,
}

impl IndexedMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EpisodicStore for IndexedMemoryStore {
    #[instrument(skip(self, interaction), fields(conversation_id = %interaction.conversation_id))]
    async fn store(&self, mut interaction: EpisodicInteraction) -> Result<InteractionId> {
        // Ids are store-generated; a caller-supplied id is only kept to
        // make re-inserts idempotent for backfills.
        if interaction.id.is_unassigned() {
            interaction.id = InteractionId::new();
        }
        let id = interaction.id.clone();

        let mut inner = self.inner.write().await;
        if inner.records.contains_key(&id) {
            inner.remove(&id);
        }
        inner.insert(interaction);

        debug!(interaction_id = %id, "Stored episodic interaction");
        Ok(id)
    }

    #[instrument(skip(self, query), fields(text = %query.text, limit = query.limit))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ScoredInteraction>> {
        let terms = QueryTerms::new(&query.text);
        let scored_at = now();
        let cutoff = query
            .time_window_hours
            .map(|hours| scored_at - Duration::hours(hours as i64));

        let inner = self.inner.read().await;
        let candidates = inner.candidates(query, cutoff);

        let mut results: Vec<ScoredInteraction> = candidates
            .iter()
            .filter_map(|id| inner.records.get(id))
            .filter_map(|interaction| {
                let score = relevance_score(interaction, &terms, scored_at);
                if score >= query.relevance_min {
                    Some(ScoredInteraction::new(interaction.clone(), score))
                } else {
                    None
                }
            })
            .collect();
        drop(inner);

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.interaction.timestamp.cmp(&a.interaction.timestamp))
        });
        results.truncate(query.limit);

        debug!(result_count = results.len(), "Episodic search completed");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn purge_older_than(&self, cutoff: Timestamp) -> Result<usize> {
        let mut inner = self.inner.write().await;

        let expired: Vec<InteractionId> = inner
            .by_time
            .range(..(cutoff, InteractionId::unassigned()))
            .map(|((_, id), _)| id.clone())
            .collect();

        let count = expired.len();
        for id in expired {
            inner.remove(&id);
        }

        debug!(purged_count = count, "Retention purge completed");
        Ok(count)
    }

    async fn statistics(&self) -> Result<StoreStats> {
        let inner = self.inner.read().await;

        Ok(StoreStats {
            interaction_count: inner.records.len() as u64,
            oldest_timestamp: inner.by_time.keys().next().map(|(ts, _)| *ts),
            newest_timestamp: inner.by_time.keys().next_back().map(|(ts, _)| *ts),
        })
    }
}
