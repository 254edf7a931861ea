//! The memory manager facade
//!
//! Single entry point over the three tiers. Composition is
//! fault-isolated: an episodic search failure or timeout degrades to an
//! empty result list, and the semantic tier always produces a snapshot,
//! so [`MemoryManager::get_relevant_memory`] never fails outright.

use crate::conversation::{BotHandoff, ConversationContext, ConversationId, MetadataPatch};
use crate::knowledge::PlatformKnowledge;
use crate::semantic::SemanticCache;
use crate::working::{AppendOptions, WorkingMemoryStore};
use cairn_core::{CairnConfig, HttpClient, Message, Result};
use cairn_storage::{EpisodicStore, RetentionSweeper, ScoredInteraction, SearchQuery, StoreStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{instrument, warn};

/// Everything the tiers know that is relevant to one incoming message
#[derive(Debug, Clone)]
pub struct MemoryBundle {
    /// Hot conversation state, always present
    pub working: ConversationContext,
    /// Relevance-ranked past interactions, empty when recall degrades
    pub episodic: Vec<ScoredInteraction>,
    /// Platform knowledge snapshot, always present
    pub semantic: Arc<PlatformKnowledge>,
}

pub struct MemoryManager {
    config: CairnConfig,
    working: WorkingMemoryStore,
    episodic: Arc<dyn EpisodicStore>,
    semantic: SemanticCache,
}

impl MemoryManager {
    /// Build the manager over an episodic store and HTTP client. Must
    /// be called from within a tokio runtime; validates the config.
    pub fn new(
        config: CairnConfig,
        episodic: Arc<dyn EpisodicStore>,
        client: Arc<dyn HttpClient>,
    ) -> Result<Self> {
        config.validate()?;
        let working = WorkingMemoryStore::new(config.working.clone(), episodic.clone());
        let semantic = SemanticCache::new(config.knowledge.clone(), client);
        Ok(Self {
            config,
            working,
            episodic,
            semantic,
        })
    }

    /// Assemble the memory bundle for one incoming message: the
    /// conversation's working state, episodic recall ranked against the
    /// message text, and the platform knowledge snapshot.
    #[instrument(skip(self, message_text), fields(conversation_id = %conversation_id))]
    pub async fn get_relevant_memory(
        &self,
        conversation_id: &ConversationId,
        message_text: &str,
    ) -> MemoryBundle {
        let working = self.working.get_or_create(conversation_id);
        let semantic = self.semantic.get().await;
        let episodic = self.search_episodic(message_text).await;

        MemoryBundle {
            working,
            episodic,
            semantic,
        }
    }

    /// Episodic recall with the configured limit, threshold, and time
    /// window. Failures and timeouts degrade to an empty list.
    async fn search_episodic(&self, message_text: &str) -> Vec<ScoredInteraction> {
        let search = &self.config.search;
        let query = SearchQuery::new(message_text)
            .limit(search.limit)
            .relevance_min(search.relevance_min)
            .time_window_hours(search.time_window_hours);

        let deadline = Duration::from_millis(search.timeout_ms);
        match tokio::time::timeout(deadline, self.episodic.search(&query)).await {
            Ok(Ok(results)) => results,
            Ok(Err(error)) => {
                warn!(%error, "Episodic search failed; continuing without recall");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    timeout_ms = search.timeout_ms,
                    "Episodic search timed out; continuing without recall"
                );
                Vec::new()
            }
        }
    }

    /// Append a message to working memory; persistence to the episodic
    /// tier happens in the background.
    pub fn append_message(
        &self,
        conversation_id: &ConversationId,
        message: Message,
        options: AppendOptions,
    ) {
        self.working.append_message(conversation_id, message, options);
    }

    /// Current working-memory snapshot of a conversation, creating it
    /// if absent.
    pub fn get_conversation(&self, conversation_id: &ConversationId) -> ConversationContext {
        self.working.get_or_create(conversation_id)
    }

    /// Apply a partial metadata update to a conversation
    pub fn update_metadata(&self, conversation_id: &ConversationId, patch: MetadataPatch) {
        self.working.update_metadata(conversation_id, patch);
    }

    /// Record a bot handoff on a conversation
    pub fn record_handoff(&self, conversation_id: &ConversationId, handoff: BotHandoff) {
        self.working.record_handoff(conversation_id, handoff);
    }

    /// Direct episodic search for callers that need custom queries
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ScoredInteraction>> {
        self.episodic.search(query).await
    }

    /// Episodic store statistics, for monitoring
    pub async fn statistics(&self) -> Result<StoreStats> {
        self.episodic.statistics().await
    }

    /// Number of conversations currently resident in working memory
    pub fn conversation_count(&self) -> usize {
        self.working.conversation_count()
    }

    /// Spawn the retention sweep loop for the episodic tier
    pub fn spawn_retention_sweeper(&self) -> JoinHandle<()> {
        RetentionSweeper::new(self.episodic.clone(), self.config.retention.clone()).spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::FailingHttpClient;
    use cairn_storage::IndexedMemoryStore;

    fn manager() -> MemoryManager {
        MemoryManager::new(
            CairnConfig::default(),
            Arc::new(IndexedMemoryStore::new()),
            Arc::new(FailingHttpClient),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let mut config = CairnConfig::default();
        config.search.relevance_min = 2.0;

        let result = MemoryManager::new(
            config,
            Arc::new(IndexedMemoryStore::new()),
            Arc::new(FailingHttpClient),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bundle_always_has_working_and_semantic() {
        let manager = manager();
        let bundle = manager
            .get_relevant_memory(&"c1".into(), "first contact")
            .await;

        assert_eq!(bundle.working.id.as_str(), "c1");
        assert!(bundle.episodic.is_empty());
        assert!(!bundle.semantic.agents.is_empty());
    }

    #[tokio::test]
    async fn test_append_visible_in_next_bundle() {
        let manager = manager();
        let id: ConversationId = "c1".into();

        manager.append_message(&id, Message::user("hello"), AppendOptions::default());
        let bundle = manager.get_relevant_memory(&id, "hello again").await;

        assert_eq!(bundle.working.message_count(), 1);
    }
}
