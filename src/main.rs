//! route-server
//!
//! Serves HTTP from a TOML route table, dispatching every request through
//! the per-method route trie.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum (request id → trace → timeout)
//!                        │
//!                        ▼
//!                   SharedRouter snapshot ──▶ 404 / 405
//!                        │ match
//!                        ▼
//!                   handler chain ──▶ Client Response
//!
//!     config file ──▶ ConfigWatcher ──▶ rebuild table ──▶ atomic swap
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use route_trie::config::{load_config, ConfigWatcher, ServerConfig};
use route_trie::lifecycle::{shutdown_signal, Shutdown};
use route_trie::observability::{logging, metrics};
use route_trie::HttpServer;

#[derive(Parser)]
#[command(name = "route-server")]
#[command(about = "HTTP server backed by a route trie", long_about = None)]
struct Args {
    /// Path to the TOML configuration. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the route table when the configuration file changes
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("route-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        routes = config.routes.len(),
        groups = config.groups.len(),
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    // The watcher handle must outlive the server, or notifications stop.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
