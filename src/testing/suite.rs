use tracing::error;

use super::backend::{CleanupBackend, HttpCleanupBackend};
use super::coordinator::{CleanupCoordinator, CleanupOutcome};
use super::error::CleanupResult;
use crate::config::CleanupSettings;

/// Root of a test run that creates vendor API apps.
///
/// Owns the run's [`CleanupCoordinator`] and hands out references to it while
/// test cases execute. Call one of the teardown methods exactly once, after
/// the last case has finished.
pub struct Suite {
    coordinator: CleanupCoordinator,
    settings: CleanupSettings,
}

impl Suite {
    pub fn new(settings: CleanupSettings) -> Self {
        Self {
            coordinator: CleanupCoordinator::new(),
            settings,
        }
    }

    pub fn from_env() -> Self {
        Self::new(CleanupSettings::from_env())
    }

    pub fn coordinator(&self) -> &CleanupCoordinator {
        &self.coordinator
    }

    pub fn settings(&self) -> &CleanupSettings {
        &self.settings
    }

    /// Delete every marked app over HTTP.
    pub async fn teardown(self) -> CleanupResult<CleanupOutcome> {
        let backend = HttpCleanupBackend::new(&self.settings);
        self.teardown_with(&backend).await
    }

    pub async fn teardown_with<B: CleanupBackend>(self, backend: &B) -> CleanupResult<CleanupOutcome> {
        self.coordinator.run(&self.settings, backend).await
    }

    /// Like [`teardown`](Self::teardown), but a cleanup failure fails the run.
    ///
    /// # Panics
    ///
    /// Panics if login or any delete fails, so leaked apps never go unnoticed.
    pub async fn teardown_or_abort(self) -> CleanupOutcome {
        match self.teardown().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "app cleanup failed");
                panic!("app cleanup failed: {e}");
            }
        }
    }
}
