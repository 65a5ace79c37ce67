//! Run parameters resolved from the environment.
//!
//! Everything the test-support layer and the CLI read from the process
//! environment is resolved here, once, into plain structs. The `from_lookup`
//! constructors take the variable lookup as a closure so resolution can be
//! exercised without touching the real environment.

use std::env;

use miette::Diagnostic;
use thiserror::Error;

pub const API_ORIGIN_VAR: &str = "REPLICATED_API_ORIGIN";
pub const ID_ORIGIN_VAR: &str = "REPLICATED_ID_ORIGIN";
pub const GRAPHQL_ORIGIN_VAR: &str = "REPLICATED_GRAPHQL_ORIGIN";
pub const KURL_ORIGIN_VAR: &str = "REPLICATED_KURL_ORIGIN";
pub const USER_EMAIL_VAR: &str = "VENDOR_USER_EMAIL";
pub const USER_PASSWORD_VAR: &str = "VENDOR_USER_PASSWORD";
pub const API_TOKEN_VAR: &str = "REPLICATED_API_TOKEN";

pub const DEFAULT_API_ORIGIN: &str = "https://api.replicated.com/vendor";
pub const DEFAULT_ID_ORIGIN: &str = "https://id.replicated.com";
pub const DEFAULT_GRAPHQL_ORIGIN: &str = "https://g.replicated.com/graphql";
pub const DEFAULT_KURL_ORIGIN: &str = "https://kurl.sh";

/// Configuration errors.
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .missing.join(", "))]
    #[diagnostic(
        code(replicated::config::missing_parameters),
        help("Must provide each of VENDOR_USER_EMAIL, VENDOR_USER_PASSWORD, REPLICATED_API_TOKEN")
    )]
    MissingParameters { missing: Vec<&'static str> },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read an environment variable, treating empty values as unset.
fn read_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Look up `name` through `lookup`, dropping empty values.
fn lookup_non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.is_empty())
}

/// Look up `name` through `lookup`, falling back to `default` when unset.
fn with_default<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup_non_empty(lookup, name).unwrap_or_else(|| default.to_string())
}

/// Read-only snapshot of the parameters a test run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub api_origin: String,
    pub id_origin: String,
    pub graphql_origin: String,
    pub kurl_origin: String,
    pub vendor_user_email: String,
    pub vendor_user_password: String,
    pub api_token: String,
}

impl RunParams {
    /// Resolve run parameters from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(read_env)
    }

    /// Resolve run parameters through an arbitrary variable lookup.
    ///
    /// Fails if any of the user email, user password or API token is absent.
    /// The error names every missing variable, not just the first.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = lookup_non_empty(&lookup, USER_EMAIL_VAR);
        let password = lookup_non_empty(&lookup, USER_PASSWORD_VAR);
        let token = lookup_non_empty(&lookup, API_TOKEN_VAR);

        let (vendor_user_email, vendor_user_password, api_token) = match (email, password, token) {
            (Some(e), Some(p), Some(t)) => (e, p, t),
            (e, p, t) => {
                let missing = [
                    (USER_EMAIL_VAR, e.is_none()),
                    (USER_PASSWORD_VAR, p.is_none()),
                    (API_TOKEN_VAR, t.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(ConfigError::MissingParameters { missing });
            }
        };

        Ok(Self {
            api_origin: with_default(&lookup, API_ORIGIN_VAR, DEFAULT_API_ORIGIN),
            id_origin: with_default(&lookup, ID_ORIGIN_VAR, DEFAULT_ID_ORIGIN),
            graphql_origin: with_default(&lookup, GRAPHQL_ORIGIN_VAR, DEFAULT_GRAPHQL_ORIGIN),
            kurl_origin: with_default(&lookup, KURL_ORIGIN_VAR, DEFAULT_KURL_ORIGIN),
            vendor_user_email,
            vendor_user_password,
            api_token,
        })
    }

    /// The cleanup view of these parameters.
    pub fn cleanup_settings(&self) -> CleanupSettings {
        CleanupSettings {
            api_origin: self.api_origin.clone(),
            id_origin: self.id_origin.clone(),
            credentials: Some(Credentials {
                email: self.vendor_user_email.clone(),
                password: self.vendor_user_password.clone(),
            }),
        }
    }
}

/// Vendor user login used only for cleanup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What cleanup needs from the environment.
///
/// Unlike [`RunParams`], nothing here is mandatory: absent credentials mean
/// cleanup is skipped rather than the run failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupSettings {
    pub api_origin: String,
    pub id_origin: String,
    pub credentials: Option<Credentials>,
}

impl CleanupSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(read_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = match (
            lookup_non_empty(&lookup, USER_EMAIL_VAR),
            lookup_non_empty(&lookup, USER_PASSWORD_VAR),
        ) {
            (Some(email), Some(password)) => Some(Credentials { email, password }),
            _ => None,
        };

        Self {
            api_origin: with_default(&lookup, API_ORIGIN_VAR, DEFAULT_API_ORIGIN),
            id_origin: with_default(&lookup, ID_ORIGIN_VAR, DEFAULT_ID_ORIGIN),
            credentials,
        }
    }
}

/// Settings for the ad-hoc request CLI.
///
/// Priority for each field:
/// 1. Explicit command-line value
/// 2. Environment variable
/// 3. Default (API origin only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_origin: String,
    pub api_token: Option<String>,
}

impl ClientSettings {
    pub fn new(api_origin: Option<String>, api_token: Option<String>) -> Self {
        Self::with_lookup(api_origin, api_token, read_env)
    }

    pub fn with_lookup<F>(api_origin: Option<String>, api_token: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_origin = api_origin
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| with_default(&lookup, API_ORIGIN_VAR, DEFAULT_API_ORIGIN));
        let api_token = api_token
            .filter(|v| !v.is_empty())
            .or_else(|| lookup_non_empty(&lookup, API_TOKEN_VAR));

        Self {
            api_origin,
            api_token,
        }
    }
}
