//! cueplay-host (playback host) - Ableton Live bridge
//!
//! Runs on the machine with Ableton Live and AbletonOSC installed.

use anyhow::{Context, Result};
use clap::Parser;
use cueplay_common::config::{load_config, resolve_config_path};
use cueplay_host::osc::OscClient;
use cueplay_host::{build_router, AbletonLive, AppContext, MonitorSettings};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// Command-line arguments for cueplay-host
#[derive(Parser, Debug)]
#[command(name = "cueplay-host")]
#[command(about = "Ableton Live playback host for cueplay")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/cueplay/config.toml)
    #[arg(short, long, env = "CUEPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port to listen on
    #[arg(short, long, env = "CUEPLAY_HOST_PORT")]
    port: Option<u16>,

    /// Hostname running AbletonOSC
    #[arg(long)]
    osc_hostname: Option<String>,

    /// AbletonOSC listen port
    #[arg(long)]
    osc_port: Option<u16>,

    /// Local port AbletonOSC replies to
    #[arg(long)]
    reply_port: Option<u16>,
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
        "Starting cueplay playback host (cueplay-host) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut host = config.host;
    if let Some(port) = args.port {
        host.port = port;
    }
    if let Some(hostname) = args.osc_hostname {
        host.osc_hostname = hostname;
    }
    if let Some(port) = args.osc_port {
        host.osc_port = port;
    }
    if let Some(port) = args.reply_port {
        host.reply_port = port;
    }

    let remote = (host.osc_hostname.as_str(), host.osc_port)
        .to_socket_addrs()
        .with_context(|| format!("Failed to resolve {}", host.osc_hostname))?
        .next()
        .with_context(|| format!("No address for {}", host.osc_hostname))?;

    let osc = OscClient::connect(remote, host.reply_port)
        .await
        .with_context(|| format!("Failed to bind OSC reply port {}", host.reply_port))?;
    info!(
        "AbletonOSC at {} (replies on port {})",
        osc.remote(),
        host.reply_port
    );

    let live = AbletonLive::new(osc, host.query_timeout());
    let ctx = AppContext::new(
        Arc::new(live),
        MonitorSettings {
            tick: host.tick(),
            stop_tolerance: host.stop_tolerance,
        },
    );
    let app = build_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], host.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("cueplay-host listening on http://{}", addr);

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
