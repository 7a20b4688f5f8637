//! Market API Port - Upstream Market Data
//!
//! Defines the trait for fetching raw payloads from the upstream market
//! API. The host page proxies `/api/*` through it so browsers can reach
//! the API without cross-origin restrictions.

use async_trait::async_trait;

/// Trait for upstream market API providers.
#[async_trait]
pub trait MarketApi: Send + Sync + 'static {
  /// Fetch the raw body at `path_and_query` (e.g. `/markets?page=1`).
  ///
  /// # Errors
  /// Returns error if the upstream is unreachable, times out, or answers
  /// with a non-success status.
  async fn fetch(&self, path_and_query: &str) -> anyhow::Result<Vec<u8>>;

  /// Base URL requests are forwarded to.
  fn base_url(&self) -> &str;
}
