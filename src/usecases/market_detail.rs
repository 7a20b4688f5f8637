//! Market Detail - The Page Behind One Market
//!
//! Owns the injected market record, its price model and the YES and NO
//! trading panels. The two panels share nothing but the transport and
//! the host listener: a trade on one side never waits on, observes, or
//! cancels a trade on the other.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::trading_panel::{PanelView, TradingPanel};
use crate::domain::format::{format_count, format_usd};
use crate::domain::market::{Market, Side};
use crate::domain::pricing::PriceModel;
use crate::domain::stake::Stake;
use crate::ports::listener::TradeListener;
use crate::ports::transport::TradeTransport;

/// One region of the probability bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarSegment {
  pub side: Side,
  /// e.g. `YES 68%`.
  pub label: String,
  pub percent: u8,
  /// Region width as a percentage of the bar.
  pub width_percent: Decimal,
}

/// Render-independent snapshot of the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketDetailView {
  pub id: String,
  pub question: String,
  /// e.g. `Sports · NFL`.
  pub category_line: String,
  pub closes_at: DateTime<Utc>,
  pub probability_bar: [BarSegment; 2],
  /// e.g. `1,247 traders`.
  pub traders_label: String,
  /// e.g. `$45,200 volume`.
  pub volume_label: String,
  /// e.g. `Trending #3`.
  pub trending_label: Option<String>,
  pub panels: [PanelView; 2],
}

/// A market detail page with one trading panel per side.
pub struct MarketDetail<T: TradeTransport> {
  market: Market,
  prices: PriceModel,
  yes: TradingPanel<T>,
  no: TradingPanel<T>,
}

impl<T: TradeTransport> MarketDetail<T> {
  /// Mount the page for `market`.
  pub fn new(market: Market, transport: Arc<T>, listener: Arc<dyn TradeListener>) -> Self {
    let prices = PriceModel::from_market(&market);
    let yes = TradingPanel::new(
      Side::Yes,
      prices.price(Side::Yes),
      Arc::clone(&transport),
      Arc::clone(&listener),
    );
    let no = TradingPanel::new(Side::No, prices.price(Side::No), transport, listener);
    Self {
      market,
      prices,
      yes,
      no,
    }
  }

  pub const fn market(&self) -> &Market {
    &self.market
  }

  pub const fn price_model(&self) -> &PriceModel {
    &self.prices
  }

  /// Trading panel for a side.
  pub const fn panel(&self, side: Side) -> &TradingPanel<T> {
    match side {
      Side::Yes => &self.yes,
      Side::No => &self.no,
    }
  }

  /// Snapshot the page.
  pub fn view(&self) -> MarketDetailView {
    MarketDetailView {
      id: self.market.id.clone(),
      question: self.market.question.clone(),
      category_line: self.market.category_line(),
      closes_at: self.market.closes_at,
      probability_bar: Side::ALL.map(|side| self.segment(side)),
      traders_label: format!("{} traders", format_count(self.market.trader_count)),
      volume_label: format!("{} volume", format_usd(self.market.volume)),
      trending_label: self.market.trending.map(|rank| format!("Trending #{rank}")),
      panels: Side::ALL.map(|side| self.panel(side).view()),
    }
  }

  fn segment(&self, side: Side) -> BarSegment {
    let percent = self.prices.percent(side);
    BarSegment {
      side,
      label: format!("{side} {percent}%"),
      percent,
      width_percent: self.prices.width_percent(side),
    }
  }
}

/// Host listener that logs every executed trade.
pub fn logging_listener() -> Arc<dyn TradeListener> {
  Arc::new(|side: Side, amount: Stake| {
    info!(side = %side, amount = %amount.amount(), "Trading {side} for {amount}");
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use rust_decimal_macros::dec;

  use crate::adapters::transport::SimulatedTransport;
  use crate::domain::stake::Preset;
  use crate::usecases::order_submitter::SubmissionState;

  fn sample_market() -> Market {
    Market {
      id: "1".to_string(),
      question: "Will the Chiefs win Super Bowl 2026?".to_string(),
      category: "Sports".to_string(),
      subcategory: "NFL".to_string(),
      yes_price: dec!(0.68),
      no_price: dec!(0.32),
      volume: dec!(45200),
      trader_count: 1247,
      closes_at: Utc::now(),
      trending: Some(3),
    }
  }

  fn detail() -> MarketDetail<SimulatedTransport> {
    let transport = Arc::new(SimulatedTransport::new(Duration::from_millis(1000)));
    MarketDetail::new(sample_market(), transport, logging_listener())
  }

  #[test]
  fn test_view_probability_bar() {
    let view = detail().view();
    assert_eq!(view.probability_bar[0].label, "YES 68%");
    assert_eq!(view.probability_bar[1].label, "NO 32%");
    assert_eq!(view.probability_bar[0].width_percent, dec!(68));
  }

  #[test]
  fn test_view_social_proof() {
    let view = detail().view();
    assert_eq!(view.category_line, "Sports · NFL");
    assert_eq!(view.traders_label, "1,247 traders");
    assert_eq!(view.volume_label, "$45,200 volume");
    assert_eq!(view.trending_label.as_deref(), Some("Trending #3"));
  }

  #[test]
  fn test_panels_use_their_side_price() {
    let page = detail();
    assert_eq!(page.panel(Side::Yes).price(), dec!(0.68));
    assert_eq!(page.panel(Side::No).price(), dec!(0.32));
  }

  #[test]
  fn test_panels_have_independent_stakes() {
    let page = detail();
    page.panel(Side::Yes).select_preset(Preset::Hundred);
    assert_eq!(page.panel(Side::No).current_stake().unwrap().amount(), dec!(10));
  }

  #[tokio::test(start_paused = true)]
  async fn test_sides_submit_independently() {
    let page = detail();
    let (yes, no) = tokio::join!(page.panel(Side::Yes).submit(), page.panel(Side::No).submit());
    assert!(yes.unwrap().is_some());
    assert!(no.unwrap().is_some());
    assert_eq!(page.panel(Side::Yes).state(), SubmissionState::Idle);
  }
}
