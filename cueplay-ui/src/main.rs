//! cueplay-ui (operator session) - cue selection and playback control
//!
//! Loads the setlist from cueplay-host once at startup, then serves the
//! operator page and the session API.

use anyhow::{Context, Result};
use clap::Parser;
use cueplay_common::config::{load_config, resolve_config_path};
use cueplay_common::events::EventBus;
use cueplay_ui::host::HttpHost;
use cueplay_ui::{build_router, spawn_controller, AppState, ControllerOptions, SessionController};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments for cueplay-ui
#[derive(Parser, Debug)]
#[command(name = "cueplay-ui")]
#[command(about = "Operator cue session for cueplay")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/cueplay/config.toml)
    #[arg(short, long, env = "CUEPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "CUEPLAY_UI_PORT")]
    port: Option<u16>,

    /// Base URL of cueplay-host
    #[arg(long, env = "CUEPLAY_HOST_URL")]
    host_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&resolve_config_path(args.config.as_deref()))
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting cueplay operator session (cueplay-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut ui = config.ui;
    if let Some(port) = args.port {
        ui.port = port;
    }
    if let Some(host_url) = args.host_url {
        ui.host_url = host_url;
    }

    let host = HttpHost::new(&ui.host_url, ui.request_timeout())
        .context("Failed to create playback host client")?;
    info!("Playback host: {}", host.base_url());

    let events = EventBus::new(ui.event_capacity);
    let (controller, completions) = SessionController::new(
        Arc::new(host),
        Arc::new(events.clone()),
        ControllerOptions {
            clear_selection_on_stop: ui.clear_selection_on_stop,
        },
    );
    let (handle, _task) = spawn_controller(controller, completions);

    // Startup load; the operator can retry from the page
    match handle.load().await {
        Ok(count) => info!("✓ Loaded setlist ({} cue points)", count),
        Err(e) => warn!("Setlist not loaded at startup: {}", e),
    }

    let app = build_router(AppState::new(handle, events));

    let addr = SocketAddr::from(([0, 0, 0, 0], ui.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("cueplay-ui listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
