//! Process bootstrap for the primary instance.
//!
//! Startup order follows subsystem dependencies: logging first, then
//! configuration (file + CLI overrides), then the metrics exporter,
//! then storage, and the listener last so traffic only arrives once
//! everything is ready.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use scaling_fileserver::config::validation::validate_config;
use scaling_fileserver::config::{load_config, ConfigError, ServerConfig};
use scaling_fileserver::observability::{logging, metrics};
use scaling_fileserver::storage::FileStore;
use scaling_fileserver::{ServerInstance, ServerRole};

#[derive(Parser, Debug)]
#[command(name = "scaling-fileserver", version, about = "Self-scaling HTTP file server")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the primary bind address (e.g. "0.0.0.0:8080").
    #[arg(long)]
    bind: Option<String>,

    /// Override the overflow (secondary) port.
    #[arg(long)]
    overflow_port: Option<u16>,

    /// Override the worker pool capacity.
    #[arg(long)]
    pool_capacity: Option<usize>,

    /// Override the storage root directory.
    #[arg(long)]
    storage_root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("scaling_fileserver=debug");

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(port) = cli.overflow_port {
        config.overflow.port = port;
    }
    if let Some(capacity) = cli.pool_capacity {
        config.pool.capacity = capacity;
    }
    if let Some(root) = cli.storage_root {
        config.storage.root = root;
    }

    // Overrides may have invalidated a previously valid config.
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        overflow_port = config.overflow.port,
        pool_capacity = config.pool.capacity,
        storage_root = %config.storage.root,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(FileStore::open(&config.storage.root).await?);

    let bind_addr: SocketAddr = config.listener.bind_address.parse()?;
    let primary = ServerInstance::new(
        bind_addr,
        ServerRole::Primary {
            overflow_port: config.overflow.port,
        },
        config.pool.capacity,
        store,
    );

    primary.run().await?;
    Ok(())
}
