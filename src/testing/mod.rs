//! Test-support layer for suites that create vendor API resources.
//!
//! Test cases create apps freely and mark them with a shared
//! [`CleanupCoordinator`]. Deletion is deferred to suite teardown, where a
//! single login to the identity service authorizes every delete. Logging in
//! is rate-limited, so it happens once per run rather than once per app.

mod backend;
mod coordinator;
#[cfg(test)]
mod coordinator_test;
mod error;
mod names;
mod retry;
mod suite;

pub use backend::{CleanupBackend, HttpCleanupBackend, SessionToken};
pub use coordinator::{CleanupCoordinator, CleanupOutcome};
pub use error::{CleanupError, CleanupResult};
pub use names::random_token;
pub use retry::{RetryPolicy, RetryingBackend};
pub use suite::Suite;
