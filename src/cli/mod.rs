pub mod api_client;
pub mod commands;
pub mod error;

use clap::{Args, Parser, Subcommand};
use miette::Result;
use reqwest::Method;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ClientSettings;

#[derive(Parser)]
#[command(name = "replicated")]
#[command(author, version, about = "Replicated vendor API CLI", long_about = None)]
pub struct Cli {
    /// Override the API origin (default: REPLICATED_API_ORIGIN env or https://api.replicated.com/vendor)
    #[arg(long, global = true)]
    pub api_origin: Option<String>,

    /// API token (default: REPLICATED_API_TOKEN env)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make ad-hoc API calls to the Replicated API
    Api {
        #[command(subcommand)]
        command: ApiCommands,
    },
}

#[derive(Args)]
struct BodyRequest {
    /// Request path, e.g. /v3/app/<app-id>/channel. Do not include the host.
    path: String,
    /// JSON body to send with the request
    #[arg(short, long)]
    body: Option<String>,
}

#[derive(Subcommand)]
enum ApiCommands {
    /// Make ad-hoc GET API calls to the Replicated API
    Get {
        /// Request path, e.g. /v3/apps. Do not include the host.
        path: String,
    },
    /// Make ad-hoc POST API calls to the Replicated API
    ///
    /// This is essentially like curl for the Replicated API, but uses your
    /// local credentials and prints the response unmodified. Piping the
    /// output to jq makes it easier to read.
    ///
    /// Example:
    ///   replicated api post /v3/app/2EuFxKLDxKjPNk2jxMTmF6Vxvxu/channel -b '{"name":"marc-waz-here"}'
    #[command(verbatim_doc_comment)]
    Post(BodyRequest),
    /// Make ad-hoc PUT API calls to the Replicated API
    Put(BodyRequest),
    /// Make ad-hoc PATCH API calls to the Replicated API
    Patch(BodyRequest),
}

impl ApiCommands {
    fn into_request(self) -> (Method, String, Option<String>) {
        match self {
            ApiCommands::Get { path } => (Method::GET, path, None),
            ApiCommands::Post(req) => (Method::POST, req.path, req.body),
            ApiCommands::Put(req) => (Method::PUT, req.path, req.body),
            ApiCommands::Patch(req) => (Method::PATCH, req.path, req.body),
        }
    }
}

/// Initialize tracing to stderr so stdout carries only response bodies.
///
/// `RUST_LOG` wins over the verbosity count.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "replicated=warn",
        1 => "replicated=info",
        2 => "replicated=debug",
        _ => "replicated=trace",
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = ClientSettings::new(cli.api_origin, cli.token);

    match cli.command {
        Commands::Api { command } => {
            let (method, path, body) = command.into_request();
            // Paths that send nothing succeed without a token.
            if commands::api::route(&path)?.is_none() {
                return Ok(());
            }
            let api_client = api_client::ApiClient::new(&settings)?;
            if let Some(output) =
                commands::api::dispatch(&api_client, method, &path, body.as_deref()).await?
            {
                print!("{}", output);
            }
        }
    }

    Ok(())
}
