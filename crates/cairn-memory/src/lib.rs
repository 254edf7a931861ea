//! Tiered conversational memory for multi-agent platforms
//!
//! Three tiers behind one facade:
//!
//! - **Working memory**: hot, synchronous per-conversation state with
//!   bounded residency and LRU-style eviction.
//! - **Episodic recall**: durable interaction history searched through
//!   [`cairn_storage`], persisted in the background so it never blocks
//!   the message path.
//! - **Semantic cache**: load-once platform knowledge with a
//!   compiled-in fallback snapshot.
//!
//! [`MemoryManager`] composes the tiers and degrades gracefully when
//! any single tier fails.
//!
//! # Example
//!
//! ```
//! use cairn_memory::{AppendOptions, MemoryManager};
//! use cairn_core::{default_http_client, CairnConfig, Message};
//! use cairn_storage::IndexedMemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> cairn_core::Result<()> {
//! let manager = MemoryManager::new(
//!     CairnConfig::default(),
//!     Arc::new(IndexedMemoryStore::new()),
//!     default_http_client(),
//! )?;
//!
//! let conversation = "conv-1".into();
//! manager.append_message(
//!     &conversation,
//!     Message::user("I want to sell my house"),
//!     AppendOptions::default(),
//! );
//!
//! let bundle = manager.get_relevant_memory(&conversation, "selling a house").await;
//! assert_eq!(bundle.working.message_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod conversation;
pub mod extract;
pub mod knowledge;
pub mod manager;
pub mod semantic;
pub mod working;

pub use conversation::{
    BotHandoff, ConversationContext, ConversationId, ConversationMetadata, MetadataPatch,
};
pub use extract::{Extraction, Extractor};
pub use knowledge::{
    AgentCapability, DomainKnowledge, ObjectionResponse, PlatformKnowledge,
    QualificationMethodology, QualificationRule,
};
pub use manager::{MemoryBundle, MemoryManager};
pub use semantic::SemanticCache;
pub use working::{AppendOptions, WorkingMemoryStore};
