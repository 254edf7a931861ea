//! Semantic cache: load-once platform knowledge
//!
//! Fetches the platform knowledge snapshot from a configured endpoint
//! at most once per process and serves the cached copy afterwards. Any
//! failure, at any stage, degrades to the compiled-in default snapshot;
//! this tier never returns an error to callers.

use crate::knowledge::PlatformKnowledge;
use cairn_core::constants::KNOWLEDGE_RESPONSE_BYTES_MAX;
use cairn_core::{HttpClient, HttpRequest, KnowledgeConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

pub struct SemanticCache {
    config: KnowledgeConfig,
    client: Arc<dyn HttpClient>,
    snapshot: OnceCell<Arc<PlatformKnowledge>>,
}

impl SemanticCache {
    pub fn new(config: KnowledgeConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            client,
            snapshot: OnceCell::new(),
        }
    }

    /// The platform knowledge snapshot, fetched on first call and
    /// cached for the process lifetime.
    pub async fn get(&self) -> Arc<PlatformKnowledge> {
        self.snapshot
            .get_or_init(|| async { Arc::new(self.load().await) })
            .await
            .clone()
    }

    /// Whether the snapshot has been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.snapshot.initialized()
    }

    #[instrument(skip(self))]
    async fn load(&self) -> PlatformKnowledge {
        let endpoint = match &self.config.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                debug!("No knowledge endpoint configured; using compiled-in snapshot");
                return PlatformKnowledge::default_snapshot();
            }
        };

        let request = HttpRequest::get(endpoint.as_str())
            .with_timeout(Duration::from_millis(self.config.fetch_timeout_ms));
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, %endpoint, "Knowledge fetch failed; using compiled-in snapshot");
                return PlatformKnowledge::default_snapshot();
            }
        };

        if !response.is_success() {
            warn!(
                status = response.status,
                %endpoint, "Knowledge endpoint returned an error; using compiled-in snapshot"
            );
            return PlatformKnowledge::default_snapshot();
        }
        if response.body.len() as u64 > KNOWLEDGE_RESPONSE_BYTES_MAX {
            warn!(
                body_bytes = response.body.len(),
                %endpoint, "Knowledge response too large; using compiled-in snapshot"
            );
            return PlatformKnowledge::default_snapshot();
        }

        match response.json::<PlatformKnowledge>() {
            Ok(snapshot) => {
                debug!(%endpoint, "Loaded platform knowledge snapshot");
                snapshot
            }
            Err(error) => {
                warn!(%error, %endpoint, "Knowledge response failed to parse; using compiled-in snapshot");
                PlatformKnowledge::default_snapshot()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::{FailingHttpClient, StaticHttpClient};

    fn remote_config() -> KnowledgeConfig {
        KnowledgeConfig {
            endpoint: Some("http://knowledge.test/snapshot".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_endpoint_serves_default() {
        let cache = SemanticCache::new(KnowledgeConfig::default(), Arc::new(FailingHttpClient));
        let snapshot = cache.get().await;
        assert!(!snapshot.agents.is_empty());
        assert!(cache.is_loaded());
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back() {
        let cache = SemanticCache::new(remote_config(), Arc::new(FailingHttpClient));
        let snapshot = cache.get().await;
        assert_eq!(
            snapshot.qualification.name,
            PlatformKnowledge::default_snapshot().qualification.name
        );
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let client = StaticHttpClient::ok("not json at all");
        let cache = SemanticCache::new(remote_config(), Arc::new(client));
        let snapshot = cache.get().await;
        assert!(!snapshot.domain.process_steps.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_falls_back() {
        let oversized = "x".repeat(KNOWLEDGE_RESPONSE_BYTES_MAX as usize + 1);
        let cache = SemanticCache::new(remote_config(), Arc::new(StaticHttpClient::ok(oversized)));
        let snapshot = cache.get().await;
        assert!(!snapshot.agents.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let client = StaticHttpClient::new(503, "unavailable");
        let cache = SemanticCache::new(remote_config(), Arc::new(client));
        let snapshot = cache.get().await;
        assert!(!snapshot.agents.is_empty());
    }

    #[tokio::test]
    async fn test_remote_snapshot_served_and_cached() {
        let body = serde_json::to_string(&PlatformKnowledge {
            qualification: crate::knowledge::QualificationMethodology {
                name: "Remote methodology".to_string(),
                rules: vec![],
            },
            agents: vec![],
            domain: crate::knowledge::DomainKnowledge {
                process_steps: vec!["only step".to_string()],
                objections: vec![],
                best_practices: vec![],
            },
        })
        .unwrap();

        let cache = SemanticCache::new(remote_config(), Arc::new(StaticHttpClient::ok(&body)));
        let first = cache.get().await;
        assert_eq!(first.qualification.name, "Remote methodology");

        // Second call serves the same Arc without another fetch
        let second = cache.get().await;
        assert!(Arc::ptr_eq(&first, &second));
    }
}
