//! Configuration for the Cairn memory subsystem
//!
//! Explicit defaults, validation, reasonable limits.

use crate::constants::*;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for Cairn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CairnConfig {
    /// Working memory configuration
    #[serde(default)]
    pub working: WorkingMemoryConfig,

    /// Retention configuration for the episodic tier
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Search defaults for episodic retrieval
    #[serde(default)]
    pub search: SearchConfig,

    /// Knowledge source configuration for the semantic tier
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl CairnConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.working.validate()?;
        self.retention.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

/// Working memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemoryConfig {
    /// Maximum number of conversations kept in memory
    #[serde(default = "default_conversations_max")]
    pub conversations_max: usize,

    /// Eviction drains down to conversations_max minus this margin
    #[serde(default = "default_eviction_margin")]
    pub eviction_margin: usize,

    /// Depth of the bounded background persistence queue
    #[serde(default = "default_persist_queue_depth")]
    pub persist_queue_depth: usize,

    /// Timeout for a single background episodic write (milliseconds)
    #[serde(default = "default_persist_write_timeout_ms")]
    pub persist_write_timeout_ms: u64,
}

fn default_conversations_max() -> usize {
    WORKING_MEMORY_CONVERSATIONS_COUNT_MAX_DEFAULT
}

fn default_eviction_margin() -> usize {
    WORKING_MEMORY_EVICTION_MARGIN_COUNT_DEFAULT
}

fn default_persist_queue_depth() -> usize {
    PERSIST_QUEUE_DEPTH_MAX_DEFAULT
}

fn default_persist_write_timeout_ms() -> u64 {
    PERSIST_WRITE_TIMEOUT_MS_DEFAULT
}

impl Default for WorkingMemoryConfig {
    fn default() -> Self {
        Self {
            conversations_max: default_conversations_max(),
            eviction_margin: default_eviction_margin(),
            persist_queue_depth: default_persist_queue_depth(),
            persist_write_timeout_ms: default_persist_write_timeout_ms(),
        }
    }
}

impl WorkingMemoryConfig {
    fn validate(&self) -> Result<()> {
        if self.conversations_max == 0 {
            return Err(Error::InvalidConfiguration {
                field: "working.conversations_max".into(),
                reason: "must be at least 1".into(),
            });
        }

        if self.eviction_margin >= self.conversations_max {
            return Err(Error::InvalidConfiguration {
                field: "working.eviction_margin".into(),
                reason: format!(
                    "{} must be less than conversations_max {}",
                    self.eviction_margin, self.conversations_max
                ),
            });
        }

        if self.persist_queue_depth == 0 {
            return Err(Error::InvalidConfiguration {
                field: "working.persist_queue_depth".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}

/// Retention configuration for the episodic tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Maximum age an interaction may reach before being purged (hours)
    #[serde(default = "default_retention_window_hours")]
    pub window_hours: u64,

    /// Interval between retention sweeps (hours)
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,
}

fn default_retention_window_hours() -> u64 {
    RETENTION_WINDOW_HOURS_DEFAULT
}

fn default_sweep_interval_hours() -> u64 {
    RETENTION_SWEEP_INTERVAL_HOURS_DEFAULT
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            window_hours: default_retention_window_hours(),
            sweep_interval_hours: default_sweep_interval_hours(),
        }
    }
}

impl RetentionConfig {
    fn validate(&self) -> Result<()> {
        if self.window_hours == 0 {
            return Err(Error::InvalidConfiguration {
                field: "retention.window_hours".into(),
                reason: "must be at least 1".into(),
            });
        }

        if self.sweep_interval_hours == 0 {
            return Err(Error::InvalidConfiguration {
                field: "retention.sweep_interval_hours".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}

/// Search defaults for episodic retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default number of interactions returned
    #[serde(default = "default_search_limit")]
    pub limit: usize,

    /// Default minimum relevance score
    #[serde(default = "default_relevance_min")]
    pub relevance_min: f32,

    /// Default time window restriction (hours)
    #[serde(default = "default_time_window_hours")]
    pub time_window_hours: u64,

    /// Timeout for a single search call (milliseconds)
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_search_limit() -> usize {
    SEARCH_LIMIT_COUNT_DEFAULT
}

fn default_relevance_min() -> f32 {
    SEARCH_RELEVANCE_MIN_DEFAULT
}

fn default_time_window_hours() -> u64 {
    SEARCH_TIME_WINDOW_HOURS_DEFAULT
}

fn default_search_timeout_ms() -> u64 {
    SEARCH_TIMEOUT_MS_DEFAULT
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
            relevance_min: default_relevance_min(),
            time_window_hours: default_time_window_hours(),
            timeout_ms: default_search_timeout_ms(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidConfiguration {
                field: "search.limit".into(),
                reason: "must be at least 1".into(),
            });
        }

        if !(0.0..=1.0).contains(&self.relevance_min) {
            return Err(Error::InvalidConfiguration {
                field: "search.relevance_min".into(),
                reason: format!("{} must be within [0.0, 1.0]", self.relevance_min),
            });
        }

        Ok(())
    }
}

/// Knowledge source configuration for the semantic tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Knowledge-base endpoint returning a PlatformKnowledge JSON document.
    /// When unset, the embedded default snapshot is used directly.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Fetch timeout (milliseconds)
    #[serde(default = "default_knowledge_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_knowledge_timeout_ms() -> u64 {
    KNOWLEDGE_FETCH_TIMEOUT_MS_DEFAULT
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            fetch_timeout_ms: default_knowledge_timeout_ms(),
        }
    }
}
