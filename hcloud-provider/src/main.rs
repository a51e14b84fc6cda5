//! hcloud-provider: one-shot convergence of a Hetzner Cloud managed resource.
//!
//! Reads a managed resource (JSON, `kind`-tagged) from a file and either:
//! - observes it and prints the status the provider reports
//! - reconciles it once: observe, then create, update or delete as needed
//!
//! The resulting resource, including its status, is printed as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hcloud_provider::config::{DEFAULT_ENDPOINT, DEFAULT_TOKEN_ENV};
use hcloud_provider::{
    ClientConfig, ConnectionDetails, Connector, CredentialSource, EnvCredentials, ExternalClient,
    FileCredentials, HcloudServiceFactory, ManagedResource, ReconcileContext, reconcile_once,
};

/// Hetzner Cloud managed-resource provider
#[derive(Parser, Debug)]
#[command(name = "hcloud-provider", version, about)]
struct Args {
    /// Hetzner Cloud API endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Overall deadline for the whole pass in seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Read the API token from this file instead of the environment
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Environment variable holding the API token
    #[arg(long, default_value = DEFAULT_TOKEN_ENV)]
    token_env: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Observe the external resource and print the recorded status
    Observe {
        /// Managed resource JSON file
        file: PathBuf,
    },
    /// Observe, then create, update or delete once
    Reconcile {
        /// Managed resource JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hcloud_provider=info,reqwest=warn,hyper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = ClientConfig::default()
        .with_endpoint(args.endpoint.clone())
        .with_timeout(Duration::from_secs(args.timeout_secs));
    info!("API endpoint: {}", config.endpoint);

    let credentials: Arc<dyn CredentialSource> = match &args.token_file {
        Some(path) => Arc::new(FileCredentials::new(path.clone())),
        None => Arc::new(EnvCredentials::new(args.token_env.clone())),
    };
    let connector = Connector::new(credentials, Arc::new(HcloudServiceFactory::new(config)));

    let mut ctx = ReconcileContext::new();
    if let Some(secs) = args.deadline_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    // Cancel in-flight calls on Ctrl-C
    let token = ctx.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            token.cancel();
        }
    });

    let output = match &args.command {
        Command::Observe { file } => {
            let mut mr = read_resource(file).await?;
            let client = connector
                .connect(&ctx, &mr)
                .await
                .context("Failed to connect")?;
            let observation = client
                .observe(&ctx, &mut mr)
                .await
                .context("Observe failed")?;

            json!({
                "exists": observation.resource_exists,
                "upToDate": observation.resource_up_to_date,
                "connectionDetails": printable(&observation.connection_details),
                "resource": mr,
            })
        }
        Command::Reconcile { file } => {
            let mut mr = read_resource(file).await?;
            let client = connector
                .connect(&ctx, &mr)
                .await
                .context("Failed to connect")?;
            let reconciled = reconcile_once(client.as_ref(), &ctx, &mut mr)
                .await
                .context("Reconcile failed")?;

            json!({
                "action": reconciled.action,
                "connectionDetails": printable(&reconciled.connection_details),
                "resource": mr,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn read_resource(path: &Path) -> Result<ManagedResource> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("Failed to parse managed resource from {}", path.display()))
}

fn printable(details: &ConnectionDetails) -> BTreeMap<&str, String> {
    details
        .iter()
        .map(|(k, v)| (k.as_str(), String::from_utf8_lossy(v).into_owned()))
        .collect()
}
