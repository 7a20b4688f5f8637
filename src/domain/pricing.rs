//! Price display and payout math for binary markets.
//!
//! A share of one side costs `price` and pays 1 if that side resolves
//! true, 0 otherwise. So a stake buys `stake / price` shares and the
//! potential winnings are `stake / price`.
//!
//! Prices are not validated against each other: YES and NO are derived
//! independently, and a market whose prices do not sum to 1 still
//! renders. Display percentages are clamped to [0, 100].

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::format::format_price;
use super::market::{Market, Side};
use super::stake::Stake;

/// Errors from payout math.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The price is exactly zero.
    #[error("price is zero, payout is undefined")]
    DivisionByZero,
    /// The price is negative.
    #[error("price must not be negative, got {0}")]
    InvalidPrice(Decimal),
    /// The payout does not fit the decimal range.
    #[error("payout overflows for stake {stake} at price {price}")]
    Overflow { stake: Decimal, price: Decimal },
}

/// Potential winnings of `stake` at `price` if the side resolves true.
///
/// # Errors
/// `DivisionByZero` for a zero price, `InvalidPrice` for a negative one,
/// `Overflow` if the quotient leaves the decimal range.
pub fn potential_winnings(stake: Stake, price: Decimal) -> Result<Decimal, PricingError> {
    let divisor = checked_price(price)?;
    stake
        .amount()
        .checked_div(divisor)
        .ok_or(PricingError::Overflow {
            stake: stake.amount(),
            price,
        })
}

fn checked_price(price: Decimal) -> Result<Decimal, PricingError> {
    if price.is_zero() {
        return Err(PricingError::DivisionByZero);
    }
    if price.is_sign_negative() {
        return Err(PricingError::InvalidPrice(price));
    }
    Ok(price)
}

/// Convert a unit-interval value to a whole percentage.
///
/// Rounds half up and clamps to [0, 100].
fn to_percent(value: Decimal) -> u8 {
    let percent = value
        .saturating_mul(dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, dec!(100));
    percent.to_u8().unwrap_or(0)
}

/// A market's two prices and everything derived from them for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceModel {
    yes_price: Decimal,
    no_price: Decimal,
}

impl PriceModel {
    /// Create a model from raw prices.
    pub const fn new(yes_price: Decimal, no_price: Decimal) -> Self {
        Self {
            yes_price,
            no_price,
        }
    }

    /// Create a model from a market record.
    pub const fn from_market(market: &Market) -> Self {
        Self::new(market.yes_price, market.no_price)
    }

    /// Raw price of a side.
    pub const fn price(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_price,
            Side::No => self.no_price,
        }
    }

    /// Displayed probability of a side as a whole percentage.
    pub fn percent(&self, side: Side) -> u8 {
        to_percent(self.price(side))
    }

    /// Visual weight of a side: the raw price.
    pub const fn weight(&self, side: Side) -> Decimal {
        self.price(side)
    }

    /// Width of a side's region in the probability bar, in percent of the
    /// bar, clamped to [0, 100].
    pub fn width_percent(&self, side: Side) -> Decimal {
        self.weight(side)
            .saturating_mul(dec!(100))
            .clamp(Decimal::ZERO, dec!(100))
    }

    /// Per-share price with two decimals, e.g. `0.68`.
    pub fn share_price_label(&self, side: Side) -> String {
        format_price(self.price(side))
    }

    /// Payout per unit staked on a side (`1 / price`).
    ///
    /// # Errors
    /// Same policy as [`potential_winnings`].
    pub fn payout_multiplier(&self, side: Side) -> Result<Decimal, PricingError> {
        let price = checked_price(self.price(side))?;
        Decimal::ONE.checked_div(price).ok_or(PricingError::Overflow {
            stake: Decimal::ONE,
            price,
        })
    }

    /// Potential winnings of a stake on a side.
    ///
    /// # Errors
    /// Same policy as [`potential_winnings`].
    pub fn potential_winnings(&self, side: Side, stake: Stake) -> Result<Decimal, PricingError> {
        potential_winnings(stake, self.price(side))
    }

    /// Sum of the two prices (1 for a well-formed market).
    pub fn total(&self) -> Decimal {
        self.yes_price + self.no_price
    }
}
