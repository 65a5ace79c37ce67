//! Network collaborators used by cleanup: the identity service login and the
//! vendor API app deletion.

use std::future::Future;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[cfg(test)]
use mockall::automock;

use super::error::{CleanupError, CleanupResult};
use crate::config::{CleanupSettings, Credentials};

/// Short-lived bearer token returned by the identity service.
///
/// Lives only as long as one cleanup run and is never written anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Operations cleanup needs from the outside world. Can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait CleanupBackend {
    /// Exchange user credentials for a session token.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = CleanupResult<SessionToken>> + Send;

    /// Delete one app, authorized by `session`.
    fn delete_app(
        &self,
        session: &SessionToken,
        app_id: &str,
    ) -> impl Future<Output = CleanupResult<()>> + Send;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: String,
}

/// Any status below 300 counts as success.
fn accepted(status: reqwest::StatusCode) -> bool {
    status.as_u16() < 300
}

/// [`CleanupBackend`] speaking HTTP to the real services.
///
/// No retries and no timeouts beyond the client's defaults; wrap it in
/// [`super::RetryingBackend`] to opt into retries.
pub struct HttpCleanupBackend {
    client: Client,
    id_origin: String,
    api_origin: String,
}

impl HttpCleanupBackend {
    pub fn new(settings: &CleanupSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: &CleanupSettings) -> Self {
        Self {
            client,
            id_origin: settings.id_origin.trim_end_matches('/').to_string(),
            api_origin: settings.api_origin.trim_end_matches('/').to_string(),
        }
    }
}

impl CleanupBackend for HttpCleanupBackend {
    #[instrument(skip_all, fields(id_origin = %self.id_origin))]
    async fn login(&self, credentials: &Credentials) -> CleanupResult<SessionToken> {
        let url = format!("{}/v1/login", self.id_origin);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
                remember_me: false,
            })
            .send()
            .await
            .map_err(|e| CleanupError::LoginFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !accepted(status) {
            return Err(CleanupError::LoginRejected {
                status: status.as_u16(),
            });
        }

        let body: LoginResponse =
            response
                .json()
                .await
                .map_err(|e| CleanupError::InvalidLoginResponse {
                    message: e.to_string(),
                })?;

        if body.token.is_empty() {
            return Err(CleanupError::MissingSessionToken);
        }

        debug!("obtained session token");
        Ok(SessionToken::new(body.token))
    }

    #[instrument(skip(self, session))]
    async fn delete_app(&self, session: &SessionToken, app_id: &str) -> CleanupResult<()> {
        let url = format!("{}/v1/app/{}", self.api_origin, app_id);

        let response = self
            .client
            .delete(&url)
            .header(AUTHORIZATION, session.as_str())
            .send()
            .await
            .map_err(|e| CleanupError::DeleteFailed {
                id: app_id.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !accepted(status) {
            return Err(CleanupError::DeleteRejected {
                id: app_id.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), "deleted app");
        Ok(())
    }
}
