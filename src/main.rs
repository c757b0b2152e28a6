//! Anonymous access gate.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 ANON GATE                     │
//!   Client Request    │  ┌──────────┐   ┌──────────────┐              │
//!   ──────────────────┼─▶│  http    │──▶│access_control│── allowed ──┼──▶ Platform
//!                     │  │ server   │   │  middleware  │              │    upstream
//!                     │  └──────────┘   └──────┬───────┘              │
//!                     │                        │ rejected             │
//!   Client Response   │                        ▼                      │
//!   ◀─────────────────┼────────── 302 / 401 / 403                     │
//!                     │                                               │
//!                     │  config (TOML + hot reload) · observability   │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use anon_gate::config::loader::load_config;
use anon_gate::config::watcher::ConfigWatcher;
use anon_gate::observability::{logging, metrics};
use anon_gate::{GateConfig, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "anon-gate")]
#[command(about = "Restricts anonymous access to a web analytics platform", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("anon-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        platform = %config.platform.url,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
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

    // Keep the watcher handle alive for the lifetime of the server.
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (rx, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(anon_gate::lifecycle::signals::shutdown_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
