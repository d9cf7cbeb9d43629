//! GeoStore HTTP server
//!
//! Serves the GeoJSON API over an in-memory spatial store:
//! 1. CRUD for points and polygons under `/api/points` and `/api/polygons`
//! 2. Spatial queries under `/api/spatial/*`
//!
//! Usage:
//!   geostore-server --port 8000
//!
//! Nothing is persisted; the store lives as long as the process.

use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use geostore_index::IndexConfig;
use geostore_server::build_router;
use geostore_storage::{SpatialStore, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "geostore-server")]
#[command(about = "GeoJSON spatial index and query server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "GEOSTORE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(short, long, env = "GEOSTORE_PORT", default_value = "8000")]
    port: u16,

    /// Index node capacity before a split
    #[arg(long, env = "GEOSTORE_MAX_CHILDREN", default_value_t = IndexConfig::DEFAULT_MAX_CHILDREN)]
    max_children: usize,

    /// Index node fill below which a node is merged
    #[arg(long, env = "GEOSTORE_MIN_CHILDREN", default_value_t = IndexConfig::DEFAULT_MIN_CHILDREN)]
    min_children: usize,

    /// Enable verbose debug logging
    #[arg(short, long, env = "GEOSTORE_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let index = IndexConfig::new(args.max_children, args.min_children)
        .context("Invalid index fanout")?;
    let store = SpatialStore::with_config(StoreConfig::new(index))
        .context("Failed to create store")?;
    let app = build_router(Arc::new(store));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        "GeoStore listening on {} (fanout {}/{})",
        addr, index.max_children, index.min_children
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("GeoStore stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Cannot listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
