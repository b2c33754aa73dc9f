use std::process;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use rkdist::bootstrap::{self, DistAdapter, Reconciler};
use rkdist::cli::{Cli, Commands};
use rkdist::config::{config_ref, load_config};
use rkdist::error::BootstrapError;
use rkdist::manager::ClusterManager;
use rkdist::recorder::Recorders;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::init();

    match &cli.command {
        Commands::Start { config } => {
            load_config(config)?;
            start().await
        }
    }
}

async fn start() -> anyhow::Result<()> {
    info!(target: "rkdist::main", "starting {}", bootstrap::CONTROLLER_NAME);

    let cfg = config_ref();
    let manager = ClusterManager::new();
    let adapter = DistAdapter {
        storage: cfg.storage.clone(),
        cache: cfg.cache.clone(),
        file_server_port: cfg.file_server.port,
        recorders: Recorders::default(),
    };

    // Reconcilers are supplied by the controller build that embeds this
    // bootstrap; the stock daemon registers none and only serves the
    // artifact tree.
    let reconcilers: Vec<Arc<dyn Reconciler>> = Vec::new();

    let storage = match bootstrap::setup_reconcilers(&manager, adapter, &reconcilers).await {
        Ok(storage) => storage,
        Err(BootstrapError::Config(err)) => {
            error!(target: "rkdist::main", "unrecoverable configuration error: {err:?}");
            process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    info!(
        target: "rkdist::main",
        "serving artifacts from {} at {}",
        storage.base_path().display(),
        storage.advertised_address()
    );

    // Standalone deployment: no election to contend, this process is
    // the leader as soon as bootstrap completes.
    manager.grant_leadership();

    tokio::signal::ctrl_c().await?;
    info!(target: "rkdist::main", "shutting down");
    Ok(())
}
