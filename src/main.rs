//! Gateway binary entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               INGRESS GATEWAY                 │
//!                    │                                               │
//!   POST / (JSON,    │  ┌────────┐    ┌─────────────┐               │
//!   optional gzip)   │  │  http  │───▶│ decode body │               │
//!   ─────────────────┼─▶│ server │    │ gzip + JSON │               │
//!                    │  └────────┘    └──────┬──────┘               │
//!                    │                       │ spawn                │
//!                    │                       ▼                      │
//!                    │               ┌──────────────┐   GET         │
//!                    │               │   upstream   │──────────────▶│──── Collaborator
//!                    │               │   fan-out    │◀──────────────│
//!                    │               └──────┬───────┘   {"message"} │
//!   200 envelope     │                      │ oneshot outcome      │
//!   ◀────────────────┼──────────────────────┘                      │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use ingress_gateway::config::{self, GatewayConfig};
use ingress_gateway::http::HttpServer;
use ingress_gateway::lifecycle::Shutdown;
use ingress_gateway::observability;

#[derive(Parser)]
#[command(name = "ingress-gateway")]
#[command(about = "JSON ingress gateway with single-call downstream fan-out", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&config.observability);

    tracing::info!("ingress-gateway v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_url = %config.upstream.url,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    // The served port is the configured port; nothing else is consulted.
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
