//! pattern-router
//!
//! Serves a TOML route table over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http::server ──▶ http::request ──▶ routing::Router ──▶ Handler
//!                                                          │
//!     Client Response                                      │ not found
//!     ◀───────────── http::response ◀──────────────────────┴──▶ not-found Handler
//!
//!     config file ──▶ config::loader ──▶ config::routes ──▶ routing::Router
//!          ▲                                   ▲
//!          └──── config::watcher (--watch) ────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use pattern_router::config::watcher::{apply_updates, ConfigWatcher};
use pattern_router::config::{apply_config, load_config, RouterConfig};
use pattern_router::observability::{logging, metrics};
use pattern_router::{HttpServer, Router};

#[derive(Parser)]
#[command(name = "pattern-router")]
#[command(about = "Route HTTP requests by regular expression", long_about = None)]
struct Cli {
    /// Route table (TOML). Without it every request gets the not-found response.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload routes when the config file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("pattern-router v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = Arc::new(Router::new());
    apply_config(&router, &config)?;

    // Keep the watcher alive for the lifetime of the server
    let _watcher = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let watcher = watcher.run()?;
            tokio::spawn(apply_updates(router.clone(), updates));
            Some(watcher)
        }
        _ => None,
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        routes = router.len(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Listening for connections"
    );

    let server = HttpServer::new(router, config.server.clone());
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
