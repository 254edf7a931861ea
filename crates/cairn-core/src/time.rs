//! Timestamp type shared across the memory tiers

use chrono::{DateTime, Utc};

/// Timestamp type for memory operations
///
/// Uses UTC to avoid timezone ambiguity.
pub type Timestamp = DateTime<Utc>;

/// Returns the current timestamp
pub fn now() -> Timestamp {
    Utc::now()
}
