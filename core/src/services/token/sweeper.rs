//! Retention sweep for retired refresh tokens
//!
//! Rotation already prunes the rotating user's family. This job catches
//! families of users who stopped refreshing, so their retired tokens do not
//! outlive the retention window in storage.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tl_shared::config::TokenFamilySweepConfig;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::TokenFamilyRepository;

/// Periodic pruning of token family entries past the retention window
pub struct TokenFamilySweeper<F: TokenFamilyRepository + 'static> {
    repository: Arc<F>,
    retention: Duration,
    config: TokenFamilySweepConfig,
}

impl<F: TokenFamilyRepository + 'static> TokenFamilySweeper<F> {
    pub fn new(repository: Arc<F>, retention: Duration, config: TokenFamilySweepConfig) -> Self {
        Self {
            repository,
            retention,
            config,
        }
    }

    /// Run a single sweep against the current time
    pub async fn run_once(&self) -> Result<SweepResult, DomainError> {
        self.run_at(Utc::now()).await
    }

    /// Run a single sweep as if the current time were `now`
    ///
    /// # Returns
    /// * `Ok(SweepResult)` - Summary of the sweep; empty when disabled
    /// * `Err(DomainError)` - Store failure
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SweepResult, DomainError> {
        if !self.config.enabled {
            return Ok(SweepResult::default());
        }

        let cutoff = now - self.retention;
        let entries_pruned = self.repository.prune_all_older_than(cutoff).await?;

        info!(entries_pruned, %cutoff, "Token family sweep completed");
        Ok(SweepResult {
            entries_pruned,
            cutoff: Some(cutoff),
        })
    }

    /// Start the sweeper as a background task on a fixed interval
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token family sweeper is disabled");
            return None;
        }
        if self.config.interval_seconds == 0 {
            warn!("Token family sweeper interval is zero, not starting");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Token family sweeper started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_once().await {
                    error!("Token family sweep failed: {}", e);
                }
            }
        }))
    }
}

/// Result of a sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of family entries deleted
    pub entries_pruned: usize,
    /// Entries revoked at or before this instant were eligible; `None` when disabled
    pub cutoff: Option<DateTime<Utc>>,
}

impl SweepResult {
    pub fn is_noop(&self) -> bool {
        self.entries_pruned == 0
    }
}
