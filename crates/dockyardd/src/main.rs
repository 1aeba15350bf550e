//! dockyardd - cluster inventory daemon
//!
//! Serves a unified, read-only view of ECS and EKS clusters, nodes and
//! services over HTTP.
//!
//! Usage:
//!   dockyardd [OPTIONS] [config.toml]
//!
//! Without a config file every setting takes its default and AWS
//! credentials come from the default provider chain.

mod config;
mod session;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dockyard_api::{create_router, AppState};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::DaemonConfig;
use crate::session::{load_sdk_config, AwsBackendProvider};

const DEFAULT_FILTER: &str =
    "dockyardd=info,dockyard_api=info,dockyard_gateway=info,dockyard_ecs=info,dockyard_eks=info";

#[derive(Parser, Debug)]
#[command(name = "dockyardd")]
#[command(author, version, about = "Unified ECS/EKS cluster inventory daemon")]
struct Args {
    /// Daemon config file (TOML)
    #[arg(env = "DOCKYARD_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port, overrides `server.port`
    #[arg(short, long, env = "DOCKYARD_PORT")]
    port: Option<u16>,

    /// AWS region, overrides `aws.region`
    #[arg(short, long, env = "DOCKYARD_REGION")]
    region: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    tracing::info!("Starting dockyardd");

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading config");
            DaemonConfig::load(path)?
        }
        None => {
            tracing::info!("No config file provided, using defaults");
            DaemonConfig::default()
        }
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(region) = args.region {
        config.aws.region = Some(region);
    }

    let sdk_config = load_sdk_config(&config.aws).await;
    let provider = AwsBackendProvider::new(sdk_config, config.backends);
    if provider.enabled().is_empty() {
        tracing::warn!("No backends enabled; every listing will be empty");
    }
    tracing::info!(
        backends = ?provider.enabled(),
        region = ?config.aws.region,
        max_concurrency = config.aggregator.max_concurrency,
        request_timeout_secs = config.server.request_timeout_secs,
        "Backends configured"
    );

    let state = AppState::new(Arc::new(provider), config.aggregator_config());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
