//! Cleanup error types.
//!
//! Every variant is fatal to the test run. Missing cleanup credentials are not
//! an error; see [`super::CleanupOutcome::Skipped`].

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CleanupError {
    #[error("Login request failed: {message}")]
    #[diagnostic(code(replicated::cleanup::login_failed))]
    LoginFailed { message: String },

    #[error("Login response status: {status}")]
    #[diagnostic(
        code(replicated::cleanup::login_rejected),
        help("Check VENDOR_USER_EMAIL and VENDOR_USER_PASSWORD, and REPLICATED_ID_ORIGIN if set.")
    )]
    LoginRejected { status: u16 },

    #[error("Invalid login response: {message}")]
    #[diagnostic(code(replicated::cleanup::invalid_login_response))]
    InvalidLoginResponse { message: String },

    #[error("Login failed; cannot delete apps")]
    #[diagnostic(
        code(replicated::cleanup::missing_session_token),
        help("The identity service accepted the login but returned no session token.")
    )]
    MissingSessionToken,

    #[error("Delete app {id} request failed: {message}")]
    #[diagnostic(code(replicated::cleanup::delete_failed))]
    DeleteFailed { id: String, message: String },

    #[error("Delete app {id} response status: {status}")]
    #[diagnostic(code(replicated::cleanup::delete_rejected))]
    DeleteRejected { id: String, status: u16 },
}

impl CleanupError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures, throttling and server errors are transient; client
    /// errors and malformed responses are not.
    pub fn is_transient(&self) -> bool {
        match self {
            CleanupError::LoginFailed { .. } | CleanupError::DeleteFailed { .. } => true,
            CleanupError::LoginRejected { status } | CleanupError::DeleteRejected { status, .. } => {
                *status == 429 || *status >= 500
            }
            CleanupError::InvalidLoginResponse { .. } | CleanupError::MissingSessionToken => false,
        }
    }
}

pub type CleanupResult<T> = Result<T, CleanupError>;
