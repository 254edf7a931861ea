//! Integration tests for the episodic store: end-to-end search
//! behavior, retention, and concurrent access.

use cairn_core::{now, Message, RetentionConfig};
use cairn_storage::{
    EpisodicInteraction, EpisodicStore, IndexedMemoryStore, Outcome, RetentionSweeper,
    SearchQuery,
};
use chrono::Duration;
use std::sync::Arc;

fn seed(conversation: &str, content: &str, keywords: &[&str]) -> EpisodicInteraction {
    EpisodicInteraction::new(conversation, Message::user(content), content, Outcome::Success)
        .with_keywords(keywords.iter().map(|k| k.to_string()).collect())
}

#[tokio::test]
async fn search_ranks_summary_match_above_keyword_only() {
    let store = IndexedMemoryStore::new();

    store
        .store(seed("c1", "I want to sell my house quickly", &["sell", "house"]))
        .await
        .unwrap();
    store
        .store(seed("c2", "general chat about the market", &["sell"]))
        .await
        .unwrap();

    let results = store
        .search(&SearchQuery::new("sell my house").relevance_min(0.1))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].interaction.conversation_id, "c1");
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn search_default_threshold_drops_weak_matches() {
    let store = IndexedMemoryStore::new();

    store
        .store(seed("c1", "scheduling a viewing for Tuesday", &[]))
        .await
        .unwrap();

    // Only recency contributes for this query; default minimum is 0.7
    let results = store
        .search(&SearchQuery::new("mortgage preapproval"))
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_score_mirrored_onto_record() {
    let store = IndexedMemoryStore::new();
    store
        .store(seed("c1", "asking price for the condo", &["price", "condo"]))
        .await
        .unwrap();

    let results = store
        .search(&SearchQuery::new("condo price").relevance_min(0.1))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!((results[0].score - results[0].interaction.relevance_score).abs() < f32::EPSILON);
}

#[tokio::test]
async fn unbounded_search_reaches_past_default_window() {
    let store = IndexedMemoryStore::new();
    let ts = now();

    store
        .store(
            seed("c1", "closing went through last month", &["closing"])
                .with_timestamp(ts - Duration::days(30)),
        )
        .await
        .unwrap();

    let windowed = store
        .search(&SearchQuery::new("closing").relevance_min(0.1))
        .await
        .unwrap();
    assert!(windowed.is_empty());

    let unbounded = store
        .search(&SearchQuery::new("closing").relevance_min(0.1).unbounded())
        .await
        .unwrap();
    assert_eq!(unbounded.len(), 1);
}

#[tokio::test]
async fn retention_sweep_is_bounded_by_window() {
    let store = Arc::new(IndexedMemoryStore::new());
    let ts = now();

    for days in [1i64, 5, 8, 20] {
        store
            .store(seed("c1", "history", &[]).with_timestamp(ts - Duration::days(days)))
            .await
            .unwrap();
    }

    let sweeper = RetentionSweeper::new(store.clone(), RetentionConfig::default());
    let purged = sweeper.sweep_once().await.unwrap();

    // Default window is 168 hours; the 8- and 20-day records expire
    assert_eq!(purged, 2);
    let stats = store.statistics().await.unwrap();
    assert_eq!(stats.interaction_count, 2);
    assert!(stats.oldest_timestamp.unwrap() >= ts - Duration::days(7));
}

#[tokio::test]
async fn concurrent_writes_and_purge() {
    let store = Arc::new(IndexedMemoryStore::new());
    let ts = now();

    let mut handles = Vec::new();
    for i in 0..50 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let interaction = seed(&format!("c{}", i % 5), "concurrent write", &[])
                .with_timestamp(ts - Duration::hours(i));
            store.store(interaction).await.unwrap();
        }));
    }
    let purger = {
        let store = store.clone();
        tokio::spawn(async move {
            store.purge_older_than(ts - Duration::hours(24)).await.unwrap()
        })
    };

    for handle in handles {
        handle.await.unwrap();
    }
    purger.await.unwrap();

    // Whatever interleaving happened, a final sweep leaves exactly the
    // records inside the window. The cutoff itself is exclusive, so the
    // record at exactly 24 hours survives.
    store.purge_older_than(ts - Duration::hours(24)).await.unwrap();
    let stats = store.statistics().await.unwrap();
    assert_eq!(stats.interaction_count, 25);
}

#[tokio::test]
async fn stored_ids_are_unique_across_conversations() {
    let store = IndexedMemoryStore::new();
    let mut ids = std::collections::HashSet::new();

    for i in 0..20 {
        let id = store
            .store(seed(&format!("c{i}"), "message", &[]))
            .await
            .unwrap();
        assert!(ids.insert(id));
    }

    assert_eq!(store.statistics().await.unwrap().interaction_count, 20);
}
