//! Order Submitter - Single-flight Submission State Machine
//!
//! Submits one stake at a time for a fixed side:
//! - `Idle --submit--> Pending` (ignored while already Pending)
//! - `Pending --settle--> Idle` (listener invoked with the snapshot)
//! - `Pending --fail--> Idle` (error returned, listener not invoked)
//!
//! The state lives in a `watch` channel so hosts can render a spinner
//! and disable the submit button by subscribing to it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::domain::market::{Confirmation, OrderRequest, Side};
use crate::domain::stake::Stake;
use crate::ports::listener::TradeListener;
use crate::ports::transport::{SubmissionFailed, TradeTransport};

/// Whether a panel has a submission in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
  /// Ready to accept a submit.
  Idle,
  /// A submission is awaiting its round trip.
  Pending,
}

/// Restores `Idle` when a submission ends, including when the in-flight
/// future is dropped.
struct PendingGuard<'a> {
  state: &'a watch::Sender<SubmissionState>,
}

impl Drop for PendingGuard<'_> {
  fn drop(&mut self) {
    self.state.send_replace(SubmissionState::Idle);
  }
}

/// Submits orders for one side, at most one in flight.
pub struct OrderSubmitter<T: TradeTransport> {
  /// Side every request is built for.
  side: Side,
  /// Round-trip transport.
  transport: Arc<T>,
  /// Host completion callback.
  listener: Arc<dyn TradeListener>,
  /// Current state, observable by subscribers.
  state: watch::Sender<SubmissionState>,
}

impl<T: TradeTransport> OrderSubmitter<T> {
  /// Create an idle submitter.
  pub fn new(side: Side, transport: Arc<T>, listener: Arc<dyn TradeListener>) -> Self {
    let (state, _) = watch::channel(SubmissionState::Idle);
    Self {
      side,
      transport,
      listener,
      state,
    }
  }

  /// Submit `amount` for this submitter's side.
  ///
  /// Returns `Ok(None)` without side effects when a submission is
  /// already pending. Otherwise waits for the transport and returns the
  /// confirmation after the listener has seen the trade.
  ///
  /// # Errors
  /// Returns `SubmissionFailed` from the transport; the state is back to
  /// `Idle` by the time the error is returned.
  #[instrument(skip_all, fields(side = %self.side, amount = %amount))]
  pub async fn submit(&self, amount: Stake) -> Result<Option<Confirmation>, SubmissionFailed> {
    let Some(_guard) = self.try_begin() else {
      debug!("Submission already pending, ignoring");
      return Ok(None);
    };

    let request = OrderRequest::new(self.side, amount);
    debug!(request_id = %request.id, "Order request sent to transport");

    match self.transport.execute(&request).await {
      Ok(confirmation) => {
        self.listener.on_trade(request.side, request.amount);
        info!(
          order_id = %confirmation.order_id,
          "Order settled"
        );
        Ok(Some(confirmation))
      }
      Err(e) => {
        warn!(request_id = %request.id, error = %e, "Order submission failed");
        Err(e)
      }
    }
  }

  /// Side this submitter trades.
  pub const fn side(&self) -> Side {
    self.side
  }

  /// Current state.
  pub fn state(&self) -> SubmissionState {
    *self.state.borrow()
  }

  /// Whether a submission is in flight.
  pub fn is_pending(&self) -> bool {
    self.state() == SubmissionState::Pending
  }

  /// Subscribe to state changes.
  pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
    self.state.subscribe()
  }

  /// Atomically move `Idle -> Pending`.
  fn try_begin(&self) -> Option<PendingGuard<'_>> {
    let entered = self.state.send_if_modified(|state| {
      if *state == SubmissionState::Idle {
        *state = SubmissionState::Pending;
        true
      } else {
        false
      }
    });
    entered.then(|| PendingGuard { state: &self.state })
  }
}
