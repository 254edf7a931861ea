//! Error types for Cairn
//!
//! Explicit error variants with context, using thiserror.
//!
//! The taxonomy follows the subsystem's degradation policy: transient
//! storage and knowledge-source failures are caught at the point of
//! occurrence and converted into "proceed with less context", never
//! surfaced to the turn handler.

use thiserror::Error;

/// Result type alias for Cairn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Cairn error types
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Episodic Storage Errors (transient: callers degrade, never abort)
    // =========================================================================
    #[error("Episodic write failed: {reason}")]
    StorageWriteFailed { reason: String },

    #[error("Episodic read failed: {reason}")]
    StorageReadFailed { reason: String },

    #[error("Episodic search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("Retention purge failed: {reason}")]
    PurgeFailed { reason: String },

    #[error("Storage operation timed out after {timeout_ms}ms")]
    StorageTimeout { timeout_ms: u64 },

    // =========================================================================
    // Knowledge Source Errors (always converted to the embedded default)
    // =========================================================================
    #[error("Knowledge source unavailable: {reason}")]
    KnowledgeSourceUnavailable { reason: String },

    #[error("Knowledge payload did not match the expected schema: {reason}")]
    KnowledgeSchemaMismatch { reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {field}, reason: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {reason}")]
    Internal { reason: String },

    #[error("Serialization failed: {reason}")]
    SerializationFailed { reason: String },

    #[error("Deserialization failed: {reason}")]
    DeserializationFailed { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an episodic write error
    pub fn storage_write_failed(reason: impl Into<String>) -> Self {
        Self::StorageWriteFailed {
            reason: reason.into(),
        }
    }

    /// Create an episodic read error
    pub fn storage_read_failed(reason: impl Into<String>) -> Self {
        Self::StorageReadFailed {
            reason: reason.into(),
        }
    }

    /// Create a search error
    pub fn search_failed(reason: impl Into<String>) -> Self {
        Self::SearchFailed {
            reason: reason.into(),
        }
    }

    /// Create a knowledge-source error
    pub fn knowledge_unavailable(reason: impl Into<String>) -> Self {
        Self::KnowledgeSourceUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Check whether this error is transient: the caller proceeds with
    /// degraded context instead of failing the conversational turn.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StorageWriteFailed { .. }
                | Self::StorageReadFailed { .. }
                | Self::SearchFailed { .. }
                | Self::PurgeFailed { .. }
                | Self::StorageTimeout { .. }
                | Self::KnowledgeSourceUnavailable { .. }
                | Self::KnowledgeSchemaMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializationFailed {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::storage_write_failed("disk full");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_error_is_transient() {
        assert!(Error::storage_read_failed("io").is_transient());
        assert!(Error::knowledge_unavailable("timeout").is_transient());
        assert!(!Error::config("search.limit", "must be positive").is_transient());
        assert!(!Error::internal("bug").is_transient());
    }
}
