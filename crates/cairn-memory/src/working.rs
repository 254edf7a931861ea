//! Working memory: hot, synchronous conversation state
//!
//! Every active conversation lives in a process-local map behind a
//! short-held mutex. Appends are synchronous and infallible; durable
//! persistence happens on a background task fed through a bounded
//! queue, so episodic store latency never shows up on the message path.

use crate::conversation::{BotHandoff, ConversationContext, ConversationId, MetadataPatch};
use crate::extract::Extractor;
use cairn_core::{Message, WorkingMemoryConfig};
use cairn_storage::{EpisodicInteraction, EpisodicStore, Outcome};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Per-append options beyond the message itself
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Outcome recorded on the episodic record (defaults to success)
    pub outcome: Option<Outcome>,
    /// Entities supplied by the caller, merged with extracted ones
    pub related_entities: Option<Vec<String>>,
}

impl AppendOptions {
    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn related_entities(mut self, entities: Vec<String>) -> Self {
        self.related_entities = Some(entities);
        self
    }
}

pub struct WorkingMemoryStore {
    config: WorkingMemoryConfig,
    conversations: Mutex<HashMap<ConversationId, ConversationContext>>,
    extractor: Extractor,
    persist_tx: mpsc::Sender<EpisodicInteraction>,
}

impl WorkingMemoryStore {
    /// Create the store and spawn its persister task on the current
    /// runtime. Must be called from within a tokio runtime.
    pub fn new(config: WorkingMemoryConfig, episodic: Arc<dyn EpisodicStore>) -> Self {
        let (persist_tx, persist_rx) = mpsc::channel(config.persist_queue_depth);
        spawn_persister(episodic, persist_rx, config.persist_write_timeout_ms);
        Self {
            config,
            conversations: Mutex::new(HashMap::new()),
            extractor: Extractor::new(),
            persist_tx,
        }
    }

    /// Snapshot of a conversation, creating it if absent
    pub fn get_or_create(&self, id: &ConversationId) -> ConversationContext {
        let mut conversations = self.conversations.lock();
        let created = !conversations.contains_key(id);
        let context = conversations
            .entry(id.clone())
            .or_insert_with(|| ConversationContext::new(id.clone()))
            .clone();
        if created {
            self.evict_locked(&mut conversations);
        }
        context
    }

    /// Snapshot of a conversation if it is currently resident
    pub fn get(&self, id: &ConversationId) -> Option<ConversationContext> {
        self.conversations.lock().get(id).cloned()
    }

    /// Append a message to a conversation. Synchronous and infallible;
    /// the episodic record is queued for background persistence and
    /// dropped with a warning if the queue is full.
    pub fn append_message(&self, id: &ConversationId, message: Message, options: AppendOptions) {
        // Extraction runs outside the lock
        let extraction = self.extractor.extract(&message.content);
        let mut entities = extraction.entities;
        if let Some(supplied) = options.related_entities {
            for entity in supplied {
                if !entities.iter().any(|e| e.eq_ignore_ascii_case(&entity)) {
                    entities.push(entity);
                }
            }
        }

        {
            let mut conversations = self.conversations.lock();
            let created = !conversations.contains_key(id);
            let context = conversations
                .entry(id.clone())
                .or_insert_with(|| ConversationContext::new(id.clone()));
            context.messages.push(message.clone());
            context.last_activity = cairn_core::now();
            if created {
                self.evict_locked(&mut conversations);
            }
        }

        let interaction = EpisodicInteraction::new(
            id.as_str(),
            message,
            extraction.summary,
            options.outcome.unwrap_or(Outcome::Success),
        )
        .with_keywords(extraction.keywords)
        .with_entities(entities);

        if let Err(error) = self.persist_tx.try_send(interaction) {
            warn!(conversation_id = %id, %error, "Persist queue full; dropping episodic record");
        }
    }

    /// Apply a partial metadata update, last write wins per field
    pub fn update_metadata(&self, id: &ConversationId, patch: MetadataPatch) {
        let mut conversations = self.conversations.lock();
        let created = !conversations.contains_key(id);
        let context = conversations
            .entry(id.clone())
            .or_insert_with(|| ConversationContext::new(id.clone()));
        context.metadata.apply(patch);
        context.last_activity = cairn_core::now();
        if created {
            self.evict_locked(&mut conversations);
        }
    }

    /// Record a bot handoff: appended to the handoff history and
    /// mirrored into the transcript as a system message so the episodic
    /// tier can find it later.
    pub fn record_handoff(&self, id: &ConversationId, handoff: BotHandoff) {
        let note = format!(
            "Conversation handed off from {} to {}",
            handoff.from_bot, handoff.to_bot
        );
        {
            let mut conversations = self.conversations.lock();
            let created = !conversations.contains_key(id);
            let context = conversations
                .entry(id.clone())
                .or_insert_with(|| ConversationContext::new(id.clone()));
            context.metadata.handoffs.push(handoff);
            if created {
                self.evict_locked(&mut conversations);
            }
        }
        self.append_message(
            id,
            Message::system(note),
            AppendOptions::default().outcome(Outcome::Handoff),
        );
    }

    /// Number of currently resident conversations
    pub fn conversation_count(&self) -> usize {
        self.conversations.lock().len()
    }

    /// Evict oldest-activity conversations once the map exceeds its
    /// bound, down to bound minus margin so eviction runs in bursts
    /// rather than on every insert.
    fn evict_locked(&self, conversations: &mut HashMap<ConversationId, ConversationContext>) {
        let max = self.config.conversations_max;
        if conversations.len() <= max {
            return;
        }
        let target = max.saturating_sub(self.config.eviction_margin);

        let mut by_activity: Vec<(ConversationId, cairn_core::Timestamp)> = conversations
            .iter()
            .map(|(id, context)| (id.clone(), context.last_activity))
            .collect();
        by_activity.sort_by_key(|(_, last_activity)| *last_activity);

        let evict_count = conversations.len() - target;
        for (id, _) in by_activity.into_iter().take(evict_count) {
            conversations.remove(&id);
            debug!(conversation_id = %id, "Evicted idle conversation from working memory");
        }
    }
}

fn spawn_persister(
    episodic: Arc<dyn EpisodicStore>,
    mut persist_rx: mpsc::Receiver<EpisodicInteraction>,
    write_timeout_ms: u64,
) -> JoinHandle<()> {
    let write_timeout = Duration::from_millis(write_timeout_ms);
    tokio::spawn(async move {
        while let Some(interaction) = persist_rx.recv().await {
            let conversation_id = interaction.conversation_id.clone();
            match tokio::time::timeout(write_timeout, episodic.store(interaction)).await {
                Ok(Ok(id)) => {
                    debug!(%conversation_id, interaction_id = %id, "Persisted interaction");
                }
                Ok(Err(error)) => {
                    warn!(%conversation_id, %error, "Episodic write failed; continuing without durable history");
                }
                Err(_) => {
                    warn!(
                        %conversation_id,
                        timeout_ms = write_timeout_ms,
                        "Episodic write timed out; continuing without durable history"
                    );
                }
            }
        }
        debug!("Persister task draining complete");
    })
}
