//! Model viewer web front end.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!   Browser              │                  model-viewer                    │
//!   ─────────────────────┼─▶ net (TCP / TLS) ─▶ http (router, request IDs)  │
//!                        │                        │                         │
//!                        │        ┌───────────────┼──────────────┐          │
//!                        │        ▼               ▼              ▼          │
//!                        │   site pages     site APIs      proxy           │
//!                        │   + /static/   races, items     gate → upstream ─┼──▶ asset origin
//!                        │                      │          → decode relay   │
//!                        │                      └───────────────────────────┼──▶ item XML endpoint
//!                        │                                                  │
//!                        │   config · observability · resilience · lifecycle│
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::net::TcpListener;

use model_viewer::config::{load_config, ViewerConfig};
use model_viewer::lifecycle::{signals, Shutdown};
use model_viewer::net::tls;
use model_viewer::observability::{logging, metrics};
use model_viewer::HttpServer;

#[derive(Parser)]
#[command(name = "model-viewer")]
#[command(about = "Web front end and asset proxy for the 3D model viewer", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "VIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long, env = "VIEWER_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("model-viewer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        origin = %config.proxy.origin,
        max_in_flight = config.proxy.max_in_flight,
        request_timeout_secs = config.proxy.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config.clone())?;

    if let Some(tls_config) = &config.listener.tls {
        let addr: SocketAddr = tls_config.bind_address.parse()?;
        let rustls = tls::load_tls_config(
            Path::new(&tls_config.cert_path),
            Path::new(&tls_config.key_path),
        )
        .await?;
        let app = server.router();
        let tls_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = tls::serve_tls(addr, rustls, app, tls_shutdown).await {
                tracing::error!(address = %addr, error = %e, "HTTPS listener failed");
            }
        });
    }

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
