//! Relevance scoring for episodic search
//!
//! The weighting contract is fixed: 0.3 keyword overlap, 0.4 summary
//! match, 0.2 entity overlap, 0.1 linear recency decay over 7 days,
//! clamped to [0, 1]. The matching strategy behind each term is
//! pluggable (substring heuristics here) as long as the weights hold.
//!
//! Scores are computed fresh on every search call and never written
//! back as durable truth.

use crate::interaction::EpisodicInteraction;
use cairn_core::{
    Timestamp, EXTRACT_KEYWORD_LENGTH_CHARS_MIN, SCORE_QUERY_TOKEN_LENGTH_CHARS_MIN,
    SCORE_RECENCY_DECAY_HOURS, SCORE_WEIGHT_ENTITIES, SCORE_WEIGHT_KEYWORDS, SCORE_WEIGHT_RECENCY,
    SCORE_WEIGHT_SUMMARY,
};

/// A search query pre-tokenized for scoring
///
/// Built once per search call and shared across all candidates.
#[derive(Debug, Clone)]
pub struct QueryTerms {
    /// The whole query, lowercased, for substring matching
    raw_lower: String,
    /// All tokens, lowercased
    tokens: Vec<String>,
    /// Tokens long enough for keyword overlap (length > 2)
    keyword_tokens: Vec<String>,
    /// Tokens long enough for summary matching (length > 3)
    summary_tokens: Vec<String>,
}

impl QueryTerms {
    /// Tokenize a query
    pub fn new(query: &str) -> Self {
        let raw_lower = query.trim().to_lowercase();

        let tokens: Vec<String> = raw_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let keyword_tokens = tokens
            .iter()
            .filter(|t| t.chars().count() >= SCORE_QUERY_TOKEN_LENGTH_CHARS_MIN)
            .cloned()
            .collect();

        let summary_tokens = tokens
            .iter()
            .filter(|t| t.chars().count() >= EXTRACT_KEYWORD_LENGTH_CHARS_MIN)
            .cloned()
            .collect();

        Self {
            raw_lower,
            tokens,
            keyword_tokens,
            summary_tokens,
        }
    }

    /// Whether the query carries any scorable text
    pub fn is_empty(&self) -> bool {
        self.raw_lower.is_empty()
    }
}

/// Score one candidate against the query at the given instant
pub fn relevance_score(
    interaction: &EpisodicInteraction,
    terms: &QueryTerms,
    now: Timestamp,
) -> f32 {
    let mut score = 0.0;

    score += SCORE_WEIGHT_KEYWORDS * overlap(&interaction.keywords, &terms.keyword_tokens);

    if summary_matches(&interaction.summary, terms) {
        score += SCORE_WEIGHT_SUMMARY;
    }

    score += SCORE_WEIGHT_ENTITIES * overlap(&interaction.related_entities, &terms.tokens);

    score += SCORE_WEIGHT_RECENCY * recency(interaction.timestamp, now);

    score.clamp(0.0, 1.0)
}

/// Fraction of `values` matched by any token, via case-insensitive
/// bidirectional substring containment. Capped at 1.0.
fn overlap(values: &[String], tokens: &[String]) -> f32 {
    if values.is_empty() || tokens.is_empty() {
        return 0.0;
    }

    let matched = values
        .iter()
        .filter(|v| {
            let v_lower = v.to_lowercase();
            tokens
                .iter()
                .any(|t| v_lower.contains(t.as_str()) || t.contains(&v_lower))
        })
        .count();

    (matched as f32 / values.len() as f32).min(1.0)
}

/// Summary match: the whole query as a substring, or any sufficiently
/// long query token present in the summary.
fn summary_matches(summary: &str, terms: &QueryTerms) -> bool {
    if terms.is_empty() {
        return false;
    }

    let summary_lower = summary.to_lowercase();
    if summary_lower.contains(&terms.raw_lower) {
        return true;
    }

    terms
        .summary_tokens
        .iter()
        .any(|t| summary_lower.contains(t.as_str()))
}

/// Linear decay from 1.0 (now) to 0.0 (at the decay horizon)
fn recency(timestamp: Timestamp, now: Timestamp) -> f32 {
    let age_minutes = (now - timestamp).num_minutes();
    if age_minutes <= 0 {
        return 1.0;
    }

    let age_hours = age_minutes as f32 / 60.0;
    (1.0 - age_hours / SCORE_RECENCY_DECAY_HOURS as f32).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Outcome;
    use cairn_core::{now, Message};
    use chrono::Duration;

    fn make_interaction(summary: &str, keywords: &[&str], entities: &[&str]) -> EpisodicInteraction {
        EpisodicInteraction::new("c1", Message::user(summary), summary, Outcome::Success)
            .with_keywords(keywords.iter().map(|s| s.to_string()).collect())
            .with_entities(entities.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_query_terms_tokenization() {
        let terms = QueryTerms::new("Sell my property at 123 Main St");
        assert!(terms.tokens.contains(&"sell".to_string()));
        assert!(terms.tokens.contains(&"123".to_string()));
        // "my" and "at" are too short for keyword overlap
        assert!(!terms.keyword_tokens.contains(&"my".to_string()));
        assert!(!terms.keyword_tokens.contains(&"at".to_string()));
        assert!(terms.keyword_tokens.contains(&"sell".to_string()));
    }

    #[test]
    fn test_summary_exact_substring_adds_full_weight() {
        let terms = QueryTerms::new("sell my house");
        let with_match = make_interaction("I want to sell my house today", &[], &[]);
        let without_match = make_interaction("talked about the weather", &[], &[]);

        let ts = now();
        let a = relevance_score(&with_match, &terms, ts);
        let b = relevance_score(&without_match, &terms, ts);
        assert!(a - b >= SCORE_WEIGHT_SUMMARY - f32::EPSILON);
    }

    #[test]
    fn test_keyword_overlap_partial() {
        let terms = QueryTerms::new("sell property");
        let interaction = make_interaction("zzz", &["sell", "house"], &[]);

        // one of two keywords matched: 0.3 * 0.5, plus full recency 0.1
        let score = relevance_score(&interaction, &terms, interaction.timestamp);
        assert!((score - (0.15 + 0.1)).abs() < 0.001);
    }

    #[test]
    fn test_entity_overlap() {
        let terms = QueryTerms::new("main");
        let interaction = make_interaction("zzz", &[], &["123 Main St", "$450,000"]);

        // one of two entities contains "main": 0.2 * 0.5 + recency 0.1
        let score = relevance_score(&interaction, &terms, interaction.timestamp);
        assert!((score - (0.1 + 0.1)).abs() < 0.001);
    }

    #[test]
    fn test_recency_decay_gap() {
        let terms = QueryTerms::new("unrelated query text");
        let ts = now();

        let newer = make_interaction("zzz", &[], &[]).with_timestamp(ts - Duration::hours(1));
        let older = make_interaction("zzz", &[], &[]).with_timestamp(ts - Duration::hours(144));

        let newer_score = relevance_score(&newer, &terms, ts);
        let older_score = relevance_score(&older, &terms, ts);

        assert!(newer_score >= older_score);
        let expected_gap = SCORE_WEIGHT_RECENCY * (143.0 / 168.0);
        assert!((newer_score - older_score - expected_gap).abs() < 0.005);
    }

    #[test]
    fn test_recency_zero_beyond_horizon() {
        let terms = QueryTerms::new("zzz");
        let ts = now();
        let ancient = make_interaction("yyy", &[], &[]).with_timestamp(ts - Duration::days(30));
        assert_eq!(relevance_score(&ancient, &terms, ts), 0.0);
    }

    #[test]
    fn test_empty_query_scores_recency_only() {
        let terms = QueryTerms::new("");
        let interaction = make_interaction("anything at all", &["sell"], &["123 Main St"]);
        let score = relevance_score(&interaction, &terms, interaction.timestamp);
        assert!((score - 0.1).abs() < 0.001);
    }

    #[test]
    fn test_score_clamped_to_one() {
        let terms = QueryTerms::new("sell house 123 main");
        let interaction = make_interaction(
            "sell house",
            &["sell", "house"],
            &["123 Main St"],
        );
        let score = relevance_score(&interaction, &terms, interaction.timestamp);
        assert!(score <= 1.0);
        // full keywords (0.3) + summary (0.4) + full entities (0.2) + recency (0.1)
        assert!((score - 1.0).abs() < 0.001);
    }
}
