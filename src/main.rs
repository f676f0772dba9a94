//! Tutorial CRUD server.
//!
//! # Startup
//!
//! ```text
//!   config (defaults ← TOML ← PORT/STORE_URL)
//!        │
//!        ▼
//!   logging + metrics
//!        │
//!        ▼
//!   store connect ──fail──▶ wait 2s, 4s, 8s, 16s, 32s ──▶ retry
//!        │                                     │
//!     success                            6th failure ──▶ exit(1)
//!        │
//!        ▼
//!   bind PORT ──▶ serve until SIGINT/SIGTERM
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tutorial_server::config::loader::{resolve_config, EXIT_CONFIG_ERROR};
use tutorial_server::lifecycle::signals::spawn_signal_listener;
use tutorial_server::lifecycle::{connect_with_retry, RetryPolicy, Shutdown};
use tutorial_server::observability::{logging, metrics};
use tutorial_server::store::StoreConnector;
use tutorial_server::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "tutorial-server", version, about = "Tutorial CRUD server backed by a document store")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "TUTORIAL_SERVER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("tutorial-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        port = config.listener.port,
        store = %config.store.url,
        max_retries = config.startup.max_retries,
        base_delay_ms = config.startup.base_delay_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let connector = match StoreConnector::from_config(&config.store) {
        Ok(connector) => connector,
        Err(e) => {
            tracing::error!(error = %e, "Unusable store configuration");
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    // The listener is bound only once the store is reachable.
    let policy = RetryPolicy::from(&config.startup);
    let db = match connect_with_retry(&connector, &policy).await {
        Ok(db) => db,
        Err(e) => std::process::exit(e.exit_code()),
    };

    let listener = TcpListener::bind(config.listener.bind_address()).await?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, db);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
