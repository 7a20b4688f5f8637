//! Trade Transport Port - Submission Round Trip
//!
//! Defines the trait for the network hop a submitted order takes before
//! it is acknowledged. The order-entry core never sleeps or talks to a
//! venue itself; it awaits whatever transport the host injects.
//!
//! Adapters:
//! - `SimulatedTransport`: fixed-latency acknowledgment, never fails
//! - `MeteredTransport`: records submission metrics around another transport

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::market::{Confirmation, OrderRequest};

/// The round trip for a submitted order did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("submission failed: {reason}")]
pub struct SubmissionFailed {
  /// Human-readable failure reason.
  pub reason: String,
}

impl SubmissionFailed {
  /// Create a failure with the given reason.
  pub fn new(reason: impl Into<String>) -> Self {
    Self {
      reason: reason.into(),
    }
  }
}

/// Trait for order submission transports.
///
/// Implementors carry one `OrderRequest` to wherever orders go and
/// report back. The call is the only suspension point of a submission.
#[async_trait]
pub trait TradeTransport: Send + Sync + 'static {
  /// Execute a single order request.
  ///
  /// # Errors
  /// Returns `SubmissionFailed` if the round trip fails.
  async fn execute(&self, request: &OrderRequest) -> Result<Confirmation, SubmissionFailed>;
}
