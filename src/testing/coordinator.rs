use std::sync::{Mutex, PoisonError};

use tracing::{info, instrument, warn};

use super::backend::CleanupBackend;
use super::error::CleanupResult;
use crate::config::CleanupSettings;

/// How a cleanup run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Nothing was marked; no request was made.
    NothingPending,
    /// Cleanup credentials are not configured; `pending` apps were left behind.
    Skipped { pending: usize },
    /// Every marked app was deleted.
    Deleted { count: usize },
}

/// Registry of apps to delete once every test case has finished.
///
/// One coordinator exists per test run. Test cases borrow it to mark apps;
/// the harness root owns it and calls [`CleanupCoordinator::run`] after the
/// last case completes. `run` takes `self`, so a coordinator cannot be drained
/// twice or marked after draining has begun.
#[derive(Debug, Default)]
pub struct CleanupCoordinator {
    pending: Mutex<Vec<String>>,
}

impl CleanupCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an app for deletion at teardown.
    ///
    /// Safe to call from concurrently running test cases. The id is not
    /// validated; a bad id surfaces as a delete failure during [`run`](Self::run).
    pub fn mark_for_deletion(&self, app_id: impl Into<String>) {
        // A test case that panicked mid-push cannot leave the Vec itself
        // inconsistent, so a poisoned lock is still safe to use.
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(app_id.into());
    }

    /// Snapshot of marked ids, in the order they were marked.
    pub fn pending(&self) -> Vec<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete every marked app.
    ///
    /// Logs in once, then deletes apps one at a time in the order they were
    /// marked, all under the same session token. The first failure ends the
    /// run; later apps are not attempted. Absent credentials skip cleanup
    /// without error.
    #[instrument(skip_all, fields(pending = tracing::field::Empty))]
    pub async fn run<B: CleanupBackend>(
        self,
        settings: &CleanupSettings,
        backend: &B,
    ) -> CleanupResult<CleanupOutcome> {
        let pending = self
            .pending
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::Span::current().record("pending", pending.len());

        if pending.is_empty() {
            return Ok(CleanupOutcome::NothingPending);
        }

        let Some(credentials) = settings.credentials.as_ref() else {
            warn!(
                pending = pending.len(),
                "VENDOR_USER_EMAIL or VENDOR_USER_PASSWORD not set. Skipping app cleanup"
            );
            return Ok(CleanupOutcome::Skipped {
                pending: pending.len(),
            });
        };

        let session = backend.login(credentials).await?;
        info!(count = pending.len(), "logged in, deleting apps");

        for app_id in &pending {
            backend.delete_app(&session, app_id).await?;
        }

        info!(count = pending.len(), "app cleanup complete");
        Ok(CleanupOutcome::Deleted {
            count: pending.len(),
        })
    }
}
