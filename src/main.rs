//! Market Panel - Entry Point
//!
//! Serves one market's detail page: probability bar, YES/NO trading
//! panels and the upstream API proxy. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (path from the first argument) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create the metrics registry
//! 4. Create the simulated transport, wrapped with metrics
//! 5. Mount the market detail page with a logging trade listener
//! 6. Create the upstream API client for the proxy
//! 7. Spawn the HTTP server (/live, /ready, /market, /api/*, /metrics)
//! 8. Wait for SIGINT → readiness 503 → graceful shutdown; exit with an
//!    error if the server stops first

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{broadcast, watch};
use tracing::{error, info};

use market_panel::adapters::http::{self, AppState};
use market_panel::adapters::metrics::MetricsRegistry;
use market_panel::adapters::transport::{MeteredTransport, SimulatedTransport};
use market_panel::adapters::upstream::UpstreamClient;
use market_panel::config;
use market_panel::usecases::market_detail::{MarketDetail, logging_listener};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.app.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        market = %config.market.id,
        "Starting market panel"
    );

    // ── 3. Shutdown signal channels ─────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let (ready_tx, ready_rx) = watch::channel(true);

    // ── 4. Metrics registry ─────────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new().context("Failed to create metrics registry")?,
        ))
    } else {
        None
    };

    // ── 5. Transport + market detail page ───────────────────
    let simulated = SimulatedTransport::new(config.trading.settle_latency());
    let transport = Arc::new(MeteredTransport::new(
        Arc::new(simulated),
        metrics.clone(),
    ));
    let detail = Arc::new(MarketDetail::new(
        config.market.clone(),
        transport,
        logging_listener(),
    ));

    // ── 6. Upstream API client ──────────────────────────────
    let upstream = Arc::new(
        UpstreamClient::new(config.proxy.client_config())
            .context("Failed to create upstream client")?,
    );

    // ── 7. Spawn HTTP server ────────────────────────────────
    let state = AppState {
        detail,
        upstream,
        metrics,
        ready: ready_rx,
    };
    let listener = http::bind(&config.server.bind_address)
        .await
        .context("Failed to start HTTP server")?;
    let mut server_handle =
        tokio::spawn(http::serve_on(listener, state, shutdown_tx.subscribe()));

    info!("Server spawned, page is live");

    // ── 8. Wait for SIGINT, or the server exiting on its own ─
    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("Failed to listen for SIGINT")?;
            info!("SIGINT received, initiating graceful shutdown");
        }
        result = &mut server_handle => {
            let _ = ready_tx.send(false);
            let served = result.context("HTTP server task panicked")?;
            if let Err(e) = &served {
                error!(error = %e, "HTTP server failed");
            }
            return served.and(Err(anyhow::anyhow!("HTTP server stopped unexpectedly")));
        }
    }

    // 1. Mark as not ready (readiness probe → 503)
    let _ = ready_tx.send(false);

    // 2. Signal the server to stop accepting connections
    let _ = shutdown_tx.send(());

    // 3. Let in-flight requests drain (up to 5s)
    let _ = tokio::time::timeout(Duration::from_secs(5), server_handle).await;

    info!("Shutdown complete");
    Ok(())
}
