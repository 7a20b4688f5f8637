//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::AppConfig;

/// Upper bound on upstream retries.
const MAX_PROXY_RETRIES: u32 = 10;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = load_config_str(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    market = %config.market.id,
    yes_price = %config.market.yes_price,
    no_price = %config.market.no_price,
    settle_latency_ms = config.trading.settle_latency_ms,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Returns error if parsing fails or validation rules are violated.
pub fn load_config_str(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Prices must lie in [0, 1]. Prices that do not sum to 1 are allowed
/// but logged, since each side is priced independently.
fn validate_config(config: &AppConfig) -> Result<()> {
  let market = &config.market;

  anyhow::ensure!(!market.id.is_empty(), "Market id must not be empty");
  anyhow::ensure!(
    !market.question.is_empty(),
    "Market {} has an empty question",
    market.id
  );

  for (name, price) in [("yes_price", market.yes_price), ("no_price", market.no_price)] {
    anyhow::ensure!(
      (Decimal::ZERO..=Decimal::ONE).contains(&price),
      "Market {} {name} must be in [0, 1], got {price}",
      market.id
    );
  }
  anyhow::ensure!(
    !market.volume.is_sign_negative(),
    "Market {} volume must not be negative, got {}",
    market.id,
    market.volume
  );

  if market.yes_price + market.no_price != Decimal::ONE {
    warn!(
      yes_price = %market.yes_price,
      no_price = %market.no_price,
      "Market prices do not sum to 1, sides are priced independently"
    );
  }

  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "Server bind_address must not be empty"
  );

  // Proxy validation
  anyhow::ensure!(
    config.proxy.upstream_url.starts_with("http://")
      || config.proxy.upstream_url.starts_with("https://"),
    "Proxy upstream_url must be an http(s) URL, got {:?}",
    config.proxy.upstream_url
  );
  anyhow::ensure!(config.proxy.timeout_ms > 0, "Proxy timeout_ms must be positive");
  anyhow::ensure!(
    config.proxy.max_retries <= MAX_PROXY_RETRIES,
    "Proxy max_retries must be at most {MAX_PROXY_RETRIES}, got {}",
    config.proxy.max_retries
  );
  anyhow::ensure!(
    config.proxy.max_concurrent > 0,
    "Proxy max_concurrent must be positive"
  );

  Ok(())
}
