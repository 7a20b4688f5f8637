//! Configuration Module - TOML-based Page Configuration
//!
//! Loads and validates configuration from `config.toml`. The market
//! shown on the page, the settlement latency and every network
//! endpoint are externalized here; nothing is hardcoded in the domain
//! layer.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::adapters::upstream::UpstreamClientConfig;
use crate::domain::market::Market;

/// Top-level configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the server begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Application identity and logging.
  pub app: AppSection,
  /// The market rendered on the detail page.
  pub market: Market,
  /// Order submission behaviour.
  #[serde(default)]
  pub trading: TradingConfig,
  /// HTTP server.
  #[serde(default)]
  pub server: ServerConfig,
  /// Upstream market API proxy.
  #[serde(default)]
  pub proxy: ProxyConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Order submission configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
  /// Simulated round-trip latency (milliseconds).
  #[serde(default = "default_settle_latency")]
  pub settle_latency_ms: u64,
}

impl TradingConfig {
  pub const fn settle_latency(&self) -> Duration {
    Duration::from_millis(self.settle_latency_ms)
  }
}

impl Default for TradingConfig {
  fn default() -> Self {
    Self {
      settle_latency_ms: default_settle_latency(),
    }
  }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Bind address of the host API.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
    }
  }
}

/// Upstream proxy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
  /// Upstream market API base URL.
  #[serde(default = "default_upstream_url")]
  pub upstream_url: String,
  /// Request timeout (milliseconds).
  #[serde(default = "default_timeout")]
  pub timeout_ms: u64,
  /// `User-Agent` header sent upstream.
  #[serde(default = "default_user_agent")]
  pub user_agent: String,
  /// Maximum concurrent upstream requests.
  #[serde(default = "default_max_concurrent")]
  pub max_concurrent: usize,
  /// Retries on transport errors and 5xx.
  #[serde(default)]
  pub max_retries: u32,
  /// Base delay of the exponential backoff (milliseconds).
  #[serde(default = "default_retry_base_delay")]
  pub retry_base_delay_ms: u64,
}

impl ProxyConfig {
  /// Client settings for the upstream adapter.
  pub fn client_config(&self) -> UpstreamClientConfig {
    UpstreamClientConfig {
      base_url: self.upstream_url.clone(),
      timeout: Duration::from_millis(self.timeout_ms),
      user_agent: self.user_agent.clone(),
      max_concurrent: self.max_concurrent,
      max_retries: self.max_retries,
      retry_base_delay: Duration::from_millis(self.retry_base_delay_ms),
    }
  }
}

impl Default for ProxyConfig {
  fn default() -> Self {
    Self {
      upstream_url: default_upstream_url(),
      timeout_ms: default_timeout(),
      user_agent: default_user_agent(),
      max_concurrent: default_max_concurrent(),
      max_retries: 0,
      retry_base_delay_ms: default_retry_base_delay(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics at `/metrics`.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_settle_latency() -> u64 {
  1000
}

fn default_bind_address() -> String {
  "127.0.0.1:8080".to_string()
}

fn default_upstream_url() -> String {
  "https://api.limitless.exchange".to_string()
}

fn default_timeout() -> u64 {
  10_000
}

fn default_user_agent() -> String {
  "Limitless-Ticker/1.0".to_string()
}

fn default_max_concurrent() -> usize {
  10
}

fn default_retry_base_delay() -> u64 {
  200
}
