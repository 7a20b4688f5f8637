//! Trade Listener Port - Completion Callback
//!
//! The host page's `onTrade(side, amount)` handler. Invoked exactly once
//! for every submission that settles successfully, with the side and
//! amount captured when the user pressed submit.

use crate::domain::market::Side;
use crate::domain::stake::Stake;

/// Receives executed trades from a panel.
pub trait TradeListener: Send + Sync + 'static {
  /// Called after a submission settles.
  fn on_trade(&self, side: Side, amount: Stake);
}

impl<F> TradeListener for F
where
  F: Fn(Side, Stake) + Send + Sync + 'static,
{
  fn on_trade(&self, side: Side, amount: Stake) {
    self(side, amount);
  }
}
