//! HTTP Adapter - Host Page API
//!
//! Serves the market detail page over axum 0.7:
//! - `health`: `/live` and `/ready` probes
//! - `trading`: market and panel views, stake entry and trade submission
//! - `proxy`: `/api/*` forwarded to the upstream market API
//!
//! Every response carries permissive CORS headers and `no-cache`, and
//! `OPTIONS` on any path answers 200.

pub mod error;
pub mod health;
pub mod proxy;
pub mod trading;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::header::{
  ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
  CACHE_CONTROL, CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, watch};
use tracing::{info, instrument};

pub use error::ApiError;

use crate::adapters::metrics::MetricsRegistry;
use crate::adapters::transport::MeteredTransport;
use crate::ports::market_api::MarketApi;
use crate::usecases::market_detail::MarketDetail;

/// The page served by the host, trading through the metered transport.
pub type HostedMarket = MarketDetail<MeteredTransport>;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
  pub detail: Arc<HostedMarket>,
  pub upstream: Arc<dyn MarketApi>,
  pub metrics: Option<Arc<MetricsRegistry>>,
  /// `false` once shutdown has begun.
  pub ready: watch::Receiver<bool>,
}

/// Build the full router.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/live", get(health::liveness))
    .route("/ready", get(health::readiness))
    .route("/market", get(trading::market))
    .route("/market/panels/:side", get(trading::panel))
    .route("/market/panels/:side/stake", post(trading::set_stake))
    .route("/market/panels/:side/trade", post(trading::trade))
    .route("/metrics", get(metrics))
    .route("/api/*path", get(proxy::forward))
    .layer(middleware::from_fn(cors))
    .with_state(state)
}

/// Bind the host API listener.
///
/// # Errors
/// Returns error if the address is invalid or already in use.
#[instrument]
pub async fn bind(bind_address: &str) -> anyhow::Result<TcpListener> {
  let listener = TcpListener::bind(bind_address)
    .await
    .with_context(|| format!("Failed to bind {bind_address}"))?;
  info!(address = %bind_address, "HTTP listener bound");
  Ok(listener)
}

/// Serve on an already bound listener until `shutdown_rx` fires.
pub async fn serve_on(
  listener: TcpListener,
  state: AppState,
  mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
  axum::serve(listener, router(state))
    .with_graceful_shutdown(async move {
      let _ = shutdown_rx.recv().await;
    })
    .await
    .context("HTTP server failed")?;
  Ok(())
}

async fn cors(request: Request, next: Next) -> Response {
  let mut response = if request.method() == Method::OPTIONS {
    StatusCode::OK.into_response()
  } else {
    next.run(request).await
  };

  let headers = response.headers_mut();
  headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
  headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
  headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
  headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
  response
}

async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
  let Some(metrics) = &state.metrics else {
    return Err(ApiError::NotFound("metrics are disabled".to_string()));
  };
  let body = metrics.render().map_err(|e| ApiError::Internal(e.to_string()))?;
  Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response())
}
