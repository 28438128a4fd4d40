// ABOUTME: Entry point for the gangway agent.
// ABOUTME: Parses arguments, wires adapter and store, and serves the API.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use gangway::adapter::{AdapterClient, HttpAdapter, http_client};
use gangway::api::{self, ApiState};
use gangway::config::{self, AgentConfig, StoreConfig};
use gangway::deploy::DeploymentManager;
use gangway::error::Result;
use gangway::repo::{DeploymentRepo, FileRepo, MemoryRepo};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { endpoint, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, endpoint.as_deref(), force)?;
            println!("Created {}", cwd.join(config::CONFIG_FILENAME).display());
            Ok(())
        }
        Commands::Serve { listen } => {
            let config = load_config(cli.config)?;
            serve(config, listen).await
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<AgentConfig> {
    match path {
        Some(path) => AgentConfig::load(&path),
        None => AgentConfig::discover(&env::current_dir()?),
    }
}

async fn serve(config: AgentConfig, listen: Option<SocketAddr>) -> Result<()> {
    let endpoint = config.adapter_endpoint()?;
    let client = http_client(config.adapter.pool_idle_timeout);
    let adapter = HttpAdapter::new(&endpoint, client)?.with_timeout(config.adapter.timeout);
    tracing::info!(endpoint = %adapter.endpoint(), "Using adapter");

    let repo: Arc<dyn DeploymentRepo> = match &config.store {
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory store; deployments are lost on restart");
            Arc::new(MemoryRepo::new())
        }
        StoreConfig::File { path } => Arc::new(FileRepo::open(path.clone()).await?),
    };
    let adapter: Arc<dyn AdapterClient> = Arc::new(adapter);

    let state = ApiState::new(DeploymentManager::new(repo, adapter))
        .with_request_timeout(config.request_timeout);

    let addr = listen.unwrap_or(config.listen);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Serving deployment API");

    api::serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
