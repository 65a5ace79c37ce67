//! Ad-hoc API calls - like curl for the vendor API, using local credentials
//! and returning the response unmodified.

use reqwest::Method;
use tracing::debug;

use crate::cli::api_client::ApiClient;
use crate::cli::error::{CliError, CliResult};

/// API generation a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// `v1` paths. Routed, but not served by this command yet.
    Legacy,
    /// `v3` paths, served by [`ApiClient`].
    Current,
    Unknown,
}

impl ApiVersion {
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "v1" => ApiVersion::Legacy,
            "v3" => ApiVersion::Current,
            _ => ApiVersion::Unknown,
        }
    }
}

/// A request path split into its non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    segments: Vec<String>,
}

impl RequestPath {
    /// Normalize a caller-supplied path.
    ///
    /// Empty segments are dropped, so `v3//app/` and `/v3/app` are the same
    /// path. A path with no segments at all is rejected.
    pub fn parse(raw: &str) -> CliResult<Self> {
        let segments: Vec<String> = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(CliError::EmptyPath);
        }
        Ok(Self { segments })
    }

    pub fn version(&self) -> ApiVersion {
        ApiVersion::from_segment(&self.segments[0])
    }

    /// The path with a single leading separator, e.g. `/v3/app/ABC/channel`.
    pub fn as_path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Normalize `path` and decide whether a request is sent for it.
///
/// Returns `Ok(None)` for legacy and unrecognized versions, which are
/// accepted without making a request.
pub fn route(path: &str) -> CliResult<Option<RequestPath>> {
    let path = RequestPath::parse(path)?;

    match path.version() {
        ApiVersion::Current => Ok(Some(path)),
        ApiVersion::Legacy => {
            debug!(path = %path.as_path(), "legacy API paths are not supported yet, nothing sent");
            Ok(None)
        }
        ApiVersion::Unknown => {
            debug!(path = %path.as_path(), "unrecognized API version, nothing sent");
            Ok(None)
        }
    }
}

/// Send one request to whichever client owns `path`.
///
/// Returns `Ok(None)` when [`route`] sends nothing. Errors from the client are
/// returned unchanged.
pub async fn dispatch(
    api_client: &ApiClient,
    method: Method,
    path: &str,
    body: Option<&str>,
) -> CliResult<Option<String>> {
    match route(path)? {
        Some(path) => {
            let response = api_client.send_raw(method, &path.as_path(), body).await?;
            Ok(Some(response))
        }
        None => Ok(None),
    }
}
