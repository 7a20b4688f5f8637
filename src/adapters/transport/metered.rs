//! Metered Transport - Submission Metrics Decorator
//!
//! Wraps any transport and records each round trip: accepted on entry,
//! the pending gauge while in flight, latency and outcome on exit.
//! Only submissions that passed single-flight reach a transport, so
//! ignored and rejected submits are counted by the caller.

use std::sync::Arc;

use async_trait::async_trait;
use prometheus::Histogram;
use tokio::time::Instant;

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::market::{Confirmation, OrderRequest};
use crate::ports::transport::{SubmissionFailed, TradeTransport};

/// Decrements the pending gauge when the round trip ends or is dropped.
struct InFlight {
  gauge: prometheus::IntGauge,
}

impl Drop for InFlight {
  fn drop(&mut self) {
    self.gauge.dec();
  }
}

/// Transport decorator recording submission metrics.
pub struct MeteredTransport {
  inner: Arc<dyn TradeTransport>,
  metrics: Option<Arc<MetricsRegistry>>,
}

impl MeteredTransport {
  /// Wrap `inner`; with `metrics` unset this is a passthrough.
  pub fn new(inner: Arc<dyn TradeTransport>, metrics: Option<Arc<MetricsRegistry>>) -> Self {
    Self { inner, metrics }
  }
}

#[async_trait]
impl TradeTransport for MeteredTransport {
  async fn execute(&self, request: &OrderRequest) -> Result<Confirmation, SubmissionFailed> {
    let Some(metrics) = &self.metrics else {
      return self.inner.execute(request).await;
    };

    let side = [request.side.as_str()];
    metrics.submissions_accepted.with_label_values(&side).inc();
    let gauge = metrics.pending.with_label_values(&side);
    gauge.inc();
    let _in_flight = InFlight { gauge };
    let latency: Histogram = metrics.settlement_latency.with_label_values(&side);

    let started = Instant::now();
    let result = self.inner.execute(request).await;
    latency.observe(started.elapsed().as_secs_f64());

    match &result {
      Ok(_) => metrics.submissions_settled.with_label_values(&side).inc(),
      Err(_) => metrics.submissions_failed.with_label_values(&side).inc(),
    }
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use rust_decimal_macros::dec;

  use crate::adapters::transport::SimulatedTransport;
  use crate::domain::market::Side;
  use crate::domain::stake::Stake;

  struct FailingTransport;

  #[async_trait]
  impl TradeTransport for FailingTransport {
    async fn execute(&self, _request: &OrderRequest) -> Result<Confirmation, SubmissionFailed> {
      Err(SubmissionFailed::new("rejected"))
    }
  }

  fn request(side: Side) -> OrderRequest {
    OrderRequest::new(side, Stake::new(dec!(10)).unwrap())
  }

  #[tokio::test(start_paused = true)]
  async fn test_records_settled_submission() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let transport = MeteredTransport::new(
      Arc::new(SimulatedTransport::new(Duration::from_millis(300))),
      Some(Arc::clone(&metrics)),
    );

    transport.execute(&request(Side::Yes)).await.unwrap();

    assert_eq!(metrics.submissions_accepted.with_label_values(&["yes"]).get(), 1);
    assert_eq!(metrics.submissions_settled.with_label_values(&["yes"]).get(), 1);
    assert_eq!(metrics.pending.with_label_values(&["yes"]).get(), 0);
    let latency = metrics.settlement_latency.with_label_values(&["yes"]);
    assert_eq!(latency.get_sample_count(), 1);
    assert!(latency.get_sample_sum() >= 0.3);
  }

  #[tokio::test]
  async fn test_records_failed_submission() {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let transport = MeteredTransport::new(Arc::new(FailingTransport), Some(Arc::clone(&metrics)));

    assert!(transport.execute(&request(Side::No)).await.is_err());
    assert_eq!(metrics.submissions_failed.with_label_values(&["no"]).get(), 1);
    assert_eq!(metrics.submissions_settled.with_label_values(&["no"]).get(), 0);
    assert_eq!(metrics.pending.with_label_values(&["no"]).get(), 0);
  }

  #[tokio::test]
  async fn test_passthrough_without_metrics() {
    let transport = MeteredTransport::new(Arc::new(FailingTransport), None);
    let err = transport.execute(&request(Side::Yes)).await.unwrap_err();
    assert_eq!(err.reason, "rejected");
  }
}
