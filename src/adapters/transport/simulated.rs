//! Simulated Transport - Fixed-latency Acknowledgment
//!
//! Waits a configured latency and acknowledges every request. Used by
//! the host page in place of a real venue; the delay is the only thing
//! the user observes as "Pending".

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::domain::market::{Confirmation, OrderRequest};
use crate::ports::transport::{SubmissionFailed, TradeTransport};

/// Settlement latency used when none is configured.
pub const DEFAULT_SETTLE_LATENCY: Duration = Duration::from_millis(1000);

/// Transport that settles every request after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedTransport {
  latency: Duration,
}

impl SimulatedTransport {
  pub const fn new(latency: Duration) -> Self {
    Self { latency }
  }

  pub const fn latency(&self) -> Duration {
    self.latency
  }
}

impl Default for SimulatedTransport {
  fn default() -> Self {
    Self::new(DEFAULT_SETTLE_LATENCY)
  }
}

#[async_trait]
impl TradeTransport for SimulatedTransport {
  #[instrument(skip_all, fields(request_id = %request.id, side = %request.side))]
  async fn execute(&self, request: &OrderRequest) -> Result<Confirmation, SubmissionFailed> {
    sleep(self.latency).await;
    debug!(latency_ms = self.latency.as_millis(), "Simulated settlement");
    Ok(Confirmation::for_request(request))
  }
}
