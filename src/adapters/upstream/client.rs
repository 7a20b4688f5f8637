//! Upstream HTTP Client - Bounded, Retrying Market API Client
//!
//! Wraps reqwest with a concurrency limit, a request timeout and
//! optional retries for every request the `/api/*` proxy forwards.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::ports::market_api::MarketApi;

/// Configuration for the upstream HTTP client.
#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
  /// Base URL requests are forwarded to.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
  /// `User-Agent` sent upstream.
  pub user_agent: String,
  /// Maximum concurrent requests.
  pub max_concurrent: usize,
  /// Maximum retries on transient errors.
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for UpstreamClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.limitless.exchange".to_string(),
      timeout: Duration::from_secs(10),
      user_agent: "Limitless-Ticker/1.0".to_string(),
      max_concurrent: 10,
      max_retries: 0,
      retry_base_delay: Duration::from_millis(200),
    }
  }
}

/// Concurrency-limited HTTP client for the upstream market API.
pub struct UpstreamClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: UpstreamClientConfig,
  /// Concurrency limiter.
  semaphore: Arc<Semaphore>,
}

impl UpstreamClient {
  /// Create a new upstream client.
  pub fn new(mut config: UpstreamClientConfig) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let http = Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent.clone())
      .default_headers(headers)
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    config.base_url = config.base_url.trim_end_matches('/').to_string();
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));

    Ok(Self {
      http,
      config,
      semaphore,
    })
  }

  /// GET `path_and_query`, retrying transport errors and 5xx answers.
  #[instrument(skip(self), fields(base_url = %self.config.base_url))]
  pub async fn get(&self, path_and_query: &str) -> Result<Vec<u8>> {
    let url = format!("{}{}", self.config.base_url, path_and_query);
    let _permit = self
      .semaphore
      .acquire()
      .await
      .context("Semaphore closed")?;

    let mut last_error = None;

    for attempt in 0..=self.config.max_retries {
      if attempt > 0 {
        let delay = backoff_delay(self.config.retry_base_delay, attempt);
        debug!(attempt, delay_ms = delay.as_millis(), "Retrying request");
        sleep(delay).await;
      }

      info!(url = %url, attempt, "Proxying upstream request");

      match self.http.get(&url).send().await {
        Ok(response) => match response.status() {
          status if status.is_success() => {
            let body = response
              .bytes()
              .await
              .context("Failed to read upstream body")?;
            info!(bytes = body.len(), "Upstream request succeeded");
            return Ok(body.to_vec());
          }
          status if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS => {
            warn!(status = %status, attempt, "Transient upstream error");
            last_error = Some(anyhow::anyhow!("HTTP Error {}: {}", status.as_u16(), reason(status)));
          }
          status => {
            return Err(anyhow::anyhow!("HTTP Error {}: {}", status.as_u16(), reason(status)));
          }
        },
        Err(e) => {
          warn!(error = %e, attempt, "Upstream request failed");
          last_error = Some(anyhow::Error::new(e).context(format!("Request to {url} failed")));
        }
      }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
  }

  pub const fn config(&self) -> &UpstreamClientConfig {
    &self.config
  }
}

/// Exponential backoff before retry `attempt` (1-based), saturating.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
  base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

fn reason(status: StatusCode) -> &'static str {
  status.canonical_reason().unwrap_or("Unknown")
}

#[async_trait]
impl MarketApi for UpstreamClient {
  async fn fetch(&self, path_and_query: &str) -> Result<Vec<u8>> {
    self.get(path_and_query).await
  }

  fn base_url(&self) -> &str {
    &self.config.base_url
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config_matches_upstream() {
    let config = UpstreamClientConfig::default();
    assert_eq!(config.base_url, "https://api.limitless.exchange");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.user_agent, "Limitless-Ticker/1.0");
    assert_eq!(config.max_retries, 0);
  }

  #[test]
  fn test_backoff_doubles_and_saturates() {
    let base = Duration::from_millis(200);
    assert_eq!(backoff_delay(base, 1), Duration::from_millis(200));
    assert_eq!(backoff_delay(base, 3), Duration::from_millis(800));
    assert_eq!(backoff_delay(base, 40), backoff_delay(base, 33));
  }

  #[test]
  fn test_trailing_slash_is_trimmed() {
    let client = UpstreamClient::new(UpstreamClientConfig {
      base_url: "http://127.0.0.1:9/".to_string(),
      ..UpstreamClientConfig::default()
    })
    .unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:9");
  }

  #[tokio::test]
  async fn test_unreachable_upstream_is_an_error() {
    let client = UpstreamClient::new(UpstreamClientConfig {
      base_url: "http://127.0.0.1:9".to_string(),
      timeout: Duration::from_millis(500),
      ..UpstreamClientConfig::default()
    })
    .unwrap();
    assert!(client.fetch("/markets").await.is_err());
  }
}
