//! Expired session sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use learnhub_core::result::AppResult;

use super::store::SessionStore;

/// Periodically deletes session rows past their expiry.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Session store for deleting sessions.
    session_store: Arc<SessionStore>,
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(session_store: Arc<SessionStore>) -> Self {
        Self { session_store }
    }

    /// Runs a cleanup cycle. Returns the number of sessions removed.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let removed = self.session_store.delete_expired().await?;
        if removed > 0 {
            info!(removed, "Session cleanup completed");
        }
        Ok(removed)
    }

    /// Spawns a task running a cleanup cycle every `period`.
    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_cleanup().await {
                    error!(error = %e, "Session cleanup failed");
                }
            }
        })
    }
}
