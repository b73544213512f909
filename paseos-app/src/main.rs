//! Paseos - journey store and notification relay service
//!
//! Serves the guidebook document API, the notification relay that forwards
//! notification clicks to open journey pages, and the event stream.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use paseos_app::host::LoggingTray;
use paseos_app::relay::{ClientRegistry, NotificationRelay};
use paseos_app::{build_router, AppState};
use paseos_common::config::{PaseosConfig, StoreBackend};
use paseos_common::events::EventBus;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for paseos
#[derive(Parser, Debug)]
#[command(name = "paseos")]
#[command(about = "Journey store and notification relay for Paseos")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "PASEOS_PORT")]
    port: Option<u16>,

    /// Store backend: local, remote or memory (overrides config)
    #[arg(long)]
    store: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        PaseosConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(backend) = args.store {
        config.store.backend = backend;
    }

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.logging.level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Paseos v{}", env!("CARGO_PKG_VERSION"));

    let store = paseos_common::store::open(&config.store)
        .await
        .context("Failed to open guidebook store")?;

    let events = EventBus::new(1000);
    let registry = Arc::new(ClientRegistry::new(events.clone()));
    let relay = Arc::new(NotificationRelay::new(
        registry,
        Arc::new(LoggingTray),
        events.clone(),
    ));

    let app = build_router(AppState::new(store, relay, events));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Paseos listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Paseos stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
