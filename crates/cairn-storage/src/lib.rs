//! Episodic storage for the Cairn memory subsystem
//!
//! Durable, searchable interaction history: the [`EpisodicStore`]
//! contract, the in-memory indexed engine behind it, relevance scoring
//! for search, and the background retention sweeper.
//!
//! # Example
//!
//! ```
//! use cairn_storage::{EpisodicInteraction, EpisodicStore, IndexedMemoryStore, Outcome, SearchQuery};
//! use cairn_core::Message;
//!
//! # async fn example() -> cairn_core::Result<()> {
//! let store = IndexedMemoryStore::new();
//!
//! let interaction = EpisodicInteraction::new(
//!     "conv-1",
//!     Message::user("I want to sell my house"),
//!     "I want to sell my house",
//!     Outcome::Success,
//! )
//! .with_keywords(vec!["sell".to_string(), "house".to_string()]);
//!
//! store.store(interaction).await?;
//!
//! let results = store.search(&SearchQuery::new("selling a house")).await?;
//! # Ok(())
//! # }
//! ```

pub mod interaction;
pub mod memory;
pub mod retention;
pub mod score;
pub mod store;

pub use interaction::{EpisodicInteraction, InteractionId, Outcome, StoreStats};
pub use memory::IndexedMemoryStore;
pub use retention::RetentionSweeper;
pub use score::{relevance_score, QueryTerms};
pub use store::{EpisodicStore, ScoredInteraction, SearchQuery};
