//! Background retention sweeper
//!
//! Periodically purges episodic interactions older than the configured
//! retention window. Purge failures are logged and the loop keeps
//! running; expired records are swept up on the next pass.

use crate::store::EpisodicStore;
use cairn_core::{now, RetentionConfig};
use chrono::Duration;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Drives periodic retention purges against an episodic store
pub struct RetentionSweeper {
    store: Arc<dyn EpisodicStore>,
    config: RetentionConfig,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn EpisodicStore>, config: RetentionConfig) -> Self {
        Self { store, config }
    }

    /// Run a single purge pass, returning the number of records removed
    pub async fn sweep_once(&self) -> cairn_core::Result<usize> {
        let cutoff = now() - Duration::hours(self.config.window_hours as i64);
        let purged = self.store.purge_older_than(cutoff).await?;
        if purged > 0 {
            info!(purged_count = purged, "Retention sweep purged expired interactions");
        }
        Ok(purged)
    }

    /// Spawn the sweep loop on the current runtime. The first sweep
    /// happens after one full interval, not at startup.
    pub fn spawn(self) -> JoinHandle<()> {
        let period = std::time::Duration::from_secs(self.config.sweep_interval_hours * 3600);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(error) = self.sweep_once().await {
                    warn!(%error, "Retention sweep failed; will retry next interval");
                }
            }
        })
    }
}
