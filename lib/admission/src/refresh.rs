//! Background configuration refresh started by every admission check.
//!
//! The refresh runs detached from the decision. Its result only reaches later
//! checks through the provider's cached copy; the check that started it has
//! already captured its snapshot.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::collaborator::{ConfigProvider, Notifier};

/// Message shown to the user when the configuration cannot be reloaded.
pub const REFRESH_FAILED_NOTICE: &str = "load config error";

/// How a background refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The provider now caches the reloaded configuration.
    Updated,
    /// The reload failed; the failure was logged and the user notified.
    Failed,
}

/// Completion handle of a spawned configuration refresh.
///
/// Dropping the handle does not cancel the refresh.
#[derive(Debug)]
pub struct ConfigRefresh {
    handle: JoinHandle<RefreshOutcome>,
}

impl ConfigRefresh {
    /// Spawns a refresh on the current tokio runtime.
    pub(crate) fn spawn(provider: Arc<dyn ConfigProvider>, notifier: Arc<dyn Notifier>) -> Self {
        let handle = tokio::spawn(async move {
            match provider.refresh().await {
                Ok(_) => {
                    debug!("application configuration refreshed");
                    RefreshOutcome::Updated
                }
                Err(e) => {
                    error!(error = %e, "failed to refresh application configuration");
                    notifier.notify(REFRESH_FAILED_NOTICE);
                    RefreshOutcome::Failed
                }
            }
        });

        Self { handle }
    }

    /// Returns true once the refresh has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the refresh to finish.
    ///
    /// A refresh task that panicked counts as failed.
    pub async fn wait(self) -> RefreshOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "configuration refresh task did not complete");
                RefreshOutcome::Failed
            }
        }
    }
}
