use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to connect to the vendor API")]
    #[diagnostic(
        code(replicated::cli::connection_failed),
        help(
            "Check your network connection.\nOr set REPLICATED_API_ORIGIN environment variable to point to the correct server."
        )
    )]
    ConnectionFailed {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from vendor API: {message}")]
    #[diagnostic(code(replicated::cli::invalid_response))]
    InvalidResponse { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(replicated::cli::api_error))]
    ApiError { status: u16, message: String },

    #[error("No API token provided")]
    #[diagnostic(
        code(replicated::cli::missing_token),
        help("Pass --token or set the REPLICATED_API_TOKEN environment variable.")
    )]
    MissingToken,

    #[error("Request path has no segments")]
    #[diagnostic(
        code(replicated::cli::empty_path),
        help("Pass the request path, e.g. /v3/apps. Do not include the host.")
    )]
    EmptyPath,
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CliError::ConnectionFailed { source: e }
        } else {
            CliError::InvalidResponse {
                message: e.to_string(),
            }
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
