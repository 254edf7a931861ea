//! Limits and defaults for the Cairn memory subsystem
//!
//! All limits are explicit, use big-endian naming (most significant first),
//! and include units in the name.

// =============================================================================
// Working Memory Limits
// =============================================================================

/// Maximum number of conversations held in working memory
pub const WORKING_MEMORY_CONVERSATIONS_COUNT_MAX_DEFAULT: usize = 50;

/// Eviction drains to max minus this margin, so one insert does not
/// immediately re-trigger eviction
pub const WORKING_MEMORY_EVICTION_MARGIN_COUNT_DEFAULT: usize = 5;

/// Maximum depth of the background persistence queue
pub const PERSIST_QUEUE_DEPTH_MAX_DEFAULT: usize = 1024;

/// Timeout for a single background episodic write (5 sec)
pub const PERSIST_WRITE_TIMEOUT_MS_DEFAULT: u64 = 5 * 1000;

/// Maximum size of a single message content (64 KB)
pub const MESSAGE_CONTENT_SIZE_BYTES_MAX: usize = 64 * 1024;

// =============================================================================
// Episodic Store Limits
// =============================================================================

/// Retention window for episodic interactions (7 days)
pub const RETENTION_WINDOW_HOURS_DEFAULT: u64 = 7 * 24;

/// Interval between retention sweeps (24 hours)
pub const RETENTION_SWEEP_INTERVAL_HOURS_DEFAULT: u64 = 24;

/// Default number of interactions returned by a search
pub const SEARCH_LIMIT_COUNT_DEFAULT: usize = 5;

/// Default minimum relevance score for a search hit
pub const SEARCH_RELEVANCE_MIN_DEFAULT: f32 = 0.7;

/// Default search time window (7 days)
pub const SEARCH_TIME_WINDOW_HOURS_DEFAULT: u64 = 7 * 24;

/// Timeout for a single search call (2 sec)
pub const SEARCH_TIMEOUT_MS_DEFAULT: u64 = 2 * 1000;

// =============================================================================
// Relevance Scoring
// =============================================================================

/// Weight of keyword overlap in the relevance score
pub const SCORE_WEIGHT_KEYWORDS: f32 = 0.3;

/// Weight of a summary match in the relevance score
pub const SCORE_WEIGHT_SUMMARY: f32 = 0.4;

/// Weight of entity overlap in the relevance score
pub const SCORE_WEIGHT_ENTITIES: f32 = 0.2;

/// Weight of recency in the relevance score
pub const SCORE_WEIGHT_RECENCY: f32 = 0.1;

/// Recency decays linearly to zero over this many hours (7 days)
pub const SCORE_RECENCY_DECAY_HOURS: u64 = 7 * 24;

/// Query tokens shorter than this are ignored for keyword overlap
pub const SCORE_QUERY_TOKEN_LENGTH_CHARS_MIN: usize = 3;

// =============================================================================
// Extraction Heuristics
// =============================================================================

/// Keyword tokens must be longer than this many characters
pub const EXTRACT_KEYWORD_LENGTH_CHARS_MIN: usize = 4;

/// Maximum entity matches kept per pattern per message
pub const EXTRACT_ENTITY_MATCHES_COUNT_MAX: usize = 3;

/// Derived summaries are truncated to this many characters
pub const EXTRACT_SUMMARY_LENGTH_CHARS_MAX: usize = 120;

// =============================================================================
// Knowledge Source
// =============================================================================

/// Timeout for fetching the platform knowledge snapshot (10 sec)
pub const KNOWLEDGE_FETCH_TIMEOUT_MS_DEFAULT: u64 = 10 * 1000;

/// Maximum knowledge payload size in bytes (1 MB)
pub const KNOWLEDGE_RESPONSE_BYTES_MAX: u64 = 1024 * 1024;

// Compile-time assertions for constant validity
const _: () = {
    assert!(WORKING_MEMORY_EVICTION_MARGIN_COUNT_DEFAULT < WORKING_MEMORY_CONVERSATIONS_COUNT_MAX_DEFAULT);
    assert!(RETENTION_SWEEP_INTERVAL_HOURS_DEFAULT <= RETENTION_WINDOW_HOURS_DEFAULT);
    assert!(SEARCH_TIME_WINDOW_HOURS_DEFAULT == RETENTION_WINDOW_HOURS_DEFAULT);
    assert!(EXTRACT_KEYWORD_LENGTH_CHARS_MIN > SCORE_QUERY_TOKEN_LENGTH_CHARS_MIN);
    assert!(SEARCH_LIMIT_COUNT_DEFAULT >= 1);
};
