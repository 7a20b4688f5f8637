//! Trading Panel - One Side's Order Entry
//!
//! Combines a stake selector, the side's price and a single-flight
//! submitter into the state behind one "BUY YES" / "BUY NO" card.
//! The stake stays editable while a submission is pending; the pending
//! request keeps the amount it was submitted with.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use super::order_submitter::{OrderSubmitter, SubmissionState};
use crate::domain::format::{format_price, format_usd};
use crate::domain::market::{Confirmation, Side};
use crate::domain::pricing::{PricingError, potential_winnings};
use crate::domain::stake::{InvalidStake, Preset, Stake, StakeSelector};
use crate::ports::listener::TradeListener;
use crate::ports::transport::{SubmissionFailed, TradeTransport};

/// Why a panel cannot price or submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
  /// The entered stake is not a positive number.
  #[error(transparent)]
  InvalidStake(#[from] InvalidStake),
  /// The side's price has no defined payout.
  #[error(transparent)]
  Pricing(#[from] PricingError),
  /// The round trip failed.
  #[error(transparent)]
  SubmissionFailed(#[from] SubmissionFailed),
}

/// One preset button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetView {
  /// Stake amount of the button.
  pub amount: Decimal,
  /// Button label, e.g. `$50`.
  pub label: String,
  /// Whether the current stake equals this preset.
  pub selected: bool,
}

/// Render-independent snapshot of a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
  pub side: Side,
  /// Card title, e.g. `BUY YES`.
  pub title: String,
  pub price: Decimal,
  /// e.g. `0.68 per share`.
  pub price_label: String,
  pub presets: Vec<PresetView>,
  /// Current stake, `None` when the entry is invalid.
  pub stake: Option<Stake>,
  pub potential_winnings: Option<Decimal>,
  /// e.g. `Win $73.53 if YES`.
  pub winnings_label: Option<String>,
  pub state: SubmissionState,
  /// e.g. `Trade YES`.
  pub submit_label: String,
  pub submit_enabled: bool,
  /// Stake or payout problem blocking submission.
  pub validation_message: Option<String>,
  /// Failure of the last submission, cleared by the next success.
  pub last_error: Option<String>,
  pub retry_available: bool,
}

/// Order entry for a single side of a market.
pub struct TradingPanel<T: TradeTransport> {
  side: Side,
  price: Decimal,
  selector: Mutex<StakeSelector>,
  submitter: OrderSubmitter<T>,
  last_error: Mutex<Option<String>>,
}

impl<T: TradeTransport> TradingPanel<T> {
  /// Create a panel at the default stake.
  pub fn new(
    side: Side,
    price: Decimal,
    transport: Arc<T>,
    listener: Arc<dyn TradeListener>,
  ) -> Self {
    Self {
      side,
      price,
      selector: Mutex::new(StakeSelector::new()),
      submitter: OrderSubmitter::new(side, transport, listener),
      last_error: Mutex::new(None),
    }
  }

  pub const fn side(&self) -> Side {
    self.side
  }

  pub const fn price(&self) -> Decimal {
    self.price
  }

  /// Select a preset stake.
  pub fn select_preset(&self, preset: Preset) {
    self.selector().select_preset(preset);
  }

  /// Record free-form stake input.
  ///
  /// # Errors
  /// Returns the parse failure; the invalid entry is still recorded.
  pub fn set_custom(&self, raw: &str) -> Result<Stake, InvalidStake> {
    self.selector().set_custom(raw)
  }

  /// Currently selected stake.
  ///
  /// # Errors
  /// Returns `InvalidStake` when the last entry was invalid.
  pub fn current_stake(&self) -> Result<Stake, InvalidStake> {
    self.selector().current_stake()
  }

  /// Winnings of the current stake if this side resolves true.
  ///
  /// # Errors
  /// Returns the stake or pricing error that prevents a payout.
  pub fn potential_winnings(&self) -> Result<Decimal, SubmitError> {
    let stake = self.current_stake()?;
    Ok(potential_winnings(stake, self.price)?)
  }

  /// Submit the current stake.
  ///
  /// The stake is read once, before the round trip starts. Returns
  /// `Ok(None)` if a submission is already pending.
  ///
  /// # Errors
  /// `InvalidStake` or `Pricing` without entering `Pending`;
  /// `SubmissionFailed` after the state is back to `Idle`.
  #[instrument(skip_all, fields(side = %self.side))]
  pub async fn submit(&self) -> Result<Option<Confirmation>, SubmitError> {
    if self.submitter.is_pending() {
      debug!("Submit ignored, panel is pending");
      return Ok(None);
    }

    let stake = self
      .current_stake()
      .inspect_err(|e| warn!(error = %e, "Rejecting submission"))?;
    potential_winnings(stake, self.price)
      .inspect_err(|e| warn!(error = %e, "Rejecting submission"))?;

    match self.submitter.submit(stake).await {
      Ok(outcome) => {
        if outcome.is_some() {
          *self.last_error() = None;
        }
        Ok(outcome)
      }
      Err(e) => {
        *self.last_error() = Some(e.to_string());
        Err(e.into())
      }
    }
  }

  pub fn state(&self) -> SubmissionState {
    self.submitter.state()
  }

  pub fn is_pending(&self) -> bool {
    self.submitter.is_pending()
  }

  /// Subscribe to submission state changes.
  pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
    self.submitter.subscribe()
  }

  /// Snapshot everything a renderer needs.
  pub fn view(&self) -> PanelView {
    let (stake, selected) = {
      let selector = self.selector();
      (selector.current_stake(), selector.selected_preset())
    };
    let winnings = stake
      .clone()
      .map_err(SubmitError::from)
      .and_then(|s| potential_winnings(s, self.price).map_err(SubmitError::from));

    let state = self.state();
    let pending = state == SubmissionState::Pending;
    let last_error = self.last_error().clone();

    PanelView {
      side: self.side,
      title: format!("BUY {}", self.side),
      price: self.price,
      price_label: format!("{} per share", format_price(self.price)),
      presets: Preset::ALL
        .into_iter()
        .map(|preset| PresetView {
          amount: preset.amount(),
          label: format_usd(preset.amount()),
          selected: selected == Some(preset),
        })
        .collect(),
      stake: stake.ok(),
      potential_winnings: winnings.as_ref().ok().copied(),
      winnings_label: winnings
        .as_ref()
        .ok()
        .map(|w| format!("Win {} if {}", format_usd(*w), self.side)),
      state,
      submit_label: format!("Trade {}", self.side),
      submit_enabled: !pending && winnings.is_ok(),
      validation_message: winnings.as_ref().err().map(ToString::to_string),
      retry_available: !pending && last_error.is_some(),
      last_error,
    }
  }

  fn selector(&self) -> MutexGuard<'_, StakeSelector> {
    self.selector.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn last_error(&self) -> MutexGuard<'_, Option<String>> {
    self.last_error.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use rust_decimal_macros::dec;

  use crate::adapters::transport::SimulatedTransport;

  fn panel(side: Side, price: Decimal) -> TradingPanel<SimulatedTransport> {
    let transport = Arc::new(SimulatedTransport::new(Duration::from_millis(1000)));
    TradingPanel::new(side, price, transport, Arc::new(|_: Side, _: Stake| {}))
  }

  #[test]
  fn test_view_defaults() {
    let panel = panel(Side::Yes, dec!(0.68));
    let view = panel.view();
    assert_eq!(view.title, "BUY YES");
    assert_eq!(view.price_label, "0.68 per share");
    assert_eq!(view.stake.unwrap().amount(), dec!(10));
    assert_eq!(view.winnings_label.as_deref(), Some("Win $14.71 if YES"));
    assert_eq!(view.submit_label, "Trade YES");
    assert!(view.submit_enabled);
    assert!(view.presets[0].selected);
    assert!(!view.presets[1].selected);
    assert_eq!(view.presets[2].label, "$100");
  }

  #[test]
  fn test_invalid_stake_disables_submit() {
    let panel = panel(Side::No, dec!(0.32));
    assert!(panel.set_custom("-3").is_err());
    let view = panel.view();
    assert!(!view.submit_enabled);
    assert_eq!(view.stake, None);
    assert_eq!(
      view.validation_message.as_deref(),
      Some("stake must be positive, got -3")
    );
  }

  #[test]
  fn test_zero_price_disables_submit() {
    let panel = panel(Side::No, Decimal::ZERO);
    let view = panel.view();
    assert!(!view.submit_enabled);
    assert_eq!(
      panel.potential_winnings(),
      Err(SubmitError::Pricing(PricingError::DivisionByZero))
    );
  }

  #[tokio::test]
  async fn test_invalid_stake_never_enters_pending() {
    let panel = panel(Side::Yes, dec!(0.5));
    let _ = panel.set_custom("abc");
    let mut rx = panel.subscribe();
    let err = panel.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::InvalidStake(InvalidStake::NotNumeric(_))));
    assert!(!rx.has_changed().unwrap());
    assert_eq!(panel.state(), SubmissionState::Idle);
  }

  #[tokio::test(start_paused = true)]
  async fn test_submit_round_trip() {
    let panel = panel(Side::Yes, dec!(0.68));
    panel.select_preset(Preset::Fifty);
    let confirmation = panel.submit().await.unwrap().unwrap();
    assert_eq!(confirmation.amount.amount(), dec!(50));
    assert_eq!(panel.state(), SubmissionState::Idle);
    assert!(panel.view().last_error.is_none());
  }
}
