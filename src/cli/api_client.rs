use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, instrument};

use crate::cli::error::{CliError, CliResult};
use crate::config::ClientSettings;

/// API client for the current (v3) vendor API.
///
/// Every request carries the API token as its `Authorization` header.
pub struct ApiClient {
    base_url: String,
    token: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client from resolved settings.
    ///
    /// Fails with [`CliError::MissingToken`] when no token was configured, so
    /// nothing is sent without credentials.
    pub fn new(settings: &ClientSettings) -> CliResult<Self> {
        let token = settings.api_token.clone().ok_or(CliError::MissingToken)?;
        Ok(Self::with_client(
            Client::new(),
            settings.api_origin.clone(),
            token,
        ))
    }

    pub fn with_client(client: Client, base_url: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an authenticated request builder for `path`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header(AUTHORIZATION, &self.token)
            .header(ACCEPT, "application/json")
    }

    /// Send a request with an optional literal JSON body and return the raw
    /// response text.
    ///
    /// The body is passed through as-is; it is not parsed or re-encoded.
    #[instrument(skip(self, body), fields(has_body = body.is_some()))]
    pub async fn send_raw(&self, method: Method, path: &str, body: Option<&str>) -> CliResult<String> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = request.send().await?;
        Self::handle_raw_response(response).await
    }

    /// Handle API response with standardized error handling
    ///
    /// Returns the response body verbatim on success,
    /// or a CliError::ApiError on non-success status codes.
    pub async fn handle_raw_response(response: Response) -> CliResult<String> {
        let status = response.status();
        debug!(status = status.as_u16(), "vendor API responded");

        if status.is_success() {
            response.text().await.map_err(|e| CliError::InvalidResponse {
                message: e.to_string(),
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(CliError::ApiError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
