//! Opt-in exponential backoff around a [`CleanupBackend`].
//!
//! Cleanup is fail-fast by default. Wrapping a backend in [`RetryingBackend`]
//! retries transient failures before the error reaches the coordinator.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::backend::{CleanupBackend, SessionToken};
use super::error::CleanupResult;
use crate::config::Credentials;

/// Exponential backoff retry policy.
///
/// Retries with exponentially increasing delays, capped at a maximum.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy with default delays.
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Maximum number of retry attempts after the first try
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Calculate exponential backoff delay.
    pub(crate) fn delay(&self, n_past_retries: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * 2_f64.powi(n_past_retries as i32);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

/// Backend wrapper that retries transient failures.
pub struct RetryingBackend<B> {
    inner: B,
    policy: RetryPolicy,
}

impl<B: CleanupBackend + Sync> RetryingBackend<B> {
    pub fn new(inner: B, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    async fn retry<T, F, Fut>(&self, operation: &str, attempt: F) -> CleanupResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = CleanupResult<T>>,
    {
        let mut retries = 0;
        loop {
            match attempt().await {
                Err(e) if e.is_transient() && retries < self.policy.max_retries => {
                    let delay = self.policy.delay(retries);
                    warn!(operation, retry = retries + 1, ?delay, error = %e, "retrying");
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                result => return result,
            }
        }
    }
}

impl<B: CleanupBackend + Sync> CleanupBackend for RetryingBackend<B> {
    async fn login(&self, credentials: &Credentials) -> CleanupResult<SessionToken> {
        self.retry("login", move || self.inner.login(credentials)).await
    }

    async fn delete_app(&self, session: &SessionToken, app_id: &str) -> CleanupResult<()> {
        self.retry("delete_app", move || self.inner.delete_app(session, app_id))
            .await
    }
}
