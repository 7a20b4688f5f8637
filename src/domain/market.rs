//! Market domain types.
//!
//! Defines the market record shown on the detail page, the binary
//! outcome side a panel trades, and the order request/confirmation
//! values that flow through the submission pipeline.
//!
//! The market record is injected by the host page and is read-only to
//! the core: only `yes_price` and `no_price` drive any logic, the rest
//! is passthrough display data.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stake::Stake;

// ────────────────────────────────────────────
// Market record
// ────────────────────────────────────────────

/// A binary prediction market as supplied by the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Market identifier.
    pub id: String,
    /// Market question.
    pub question: String,
    /// Top-level category (e.g. "Sports").
    pub category: String,
    /// Sub-category (e.g. "NFL").
    pub subcategory: String,
    /// YES price, expected in (0, 1].
    pub yes_price: Decimal,
    /// NO price, expected in (0, 1].
    pub no_price: Decimal,
    /// Traded volume in USD.
    pub volume: Decimal,
    /// Number of distinct traders.
    pub trader_count: u64,
    /// When the market closes for trading.
    pub closes_at: DateTime<Utc>,
    /// Trending rank, if the market is trending.
    #[serde(default)]
    pub trending: Option<u32>,
}

impl Market {
    /// Price of the given side.
    pub const fn price(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_price,
            Side::No => self.no_price,
        }
    }

    /// Category line as shown under the header, e.g. `Sports · NFL`.
    pub fn category_line(&self) -> String {
        format!("{} · {}", self.category, self.subcategory)
    }
}

// ────────────────────────────────────────────
// Side
// ────────────────────────────────────────────

/// Binary outcome a trading panel targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Both sides in display order.
    pub const ALL: [Self; 2] = [Self::Yes, Self::No];

    /// Lowercase label used in metric labels and URL paths.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// Error returned when a string does not name a side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown side: {0:?} (expected yes or no)")]
pub struct UnknownSide(pub String);

impl FromStr for Side {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(UnknownSide(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────
// Submission values
// ────────────────────────────────────────────

/// A snapshot of what a panel submits.
///
/// Built once at submission time from the panel's side and the stake
/// selected at that instant. Later stake edits never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Client-side request ID.
    pub id: Uuid,
    /// Side being bought.
    pub side: Side,
    /// Stake committed to the side.
    pub amount: Stake,
    /// When the request was built.
    pub requested_at: DateTime<Utc>,
}

impl OrderRequest {
    /// Build a request for `side` with the given stake snapshot.
    pub fn new(side: Side, amount: Stake) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            amount,
            requested_at: Utc::now(),
        }
    }
}

/// Acknowledgment of a settled submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// ID of the request that settled.
    pub order_id: Uuid,
    /// Side that was bought.
    pub side: Side,
    /// Stake that was committed.
    pub amount: Stake,
    /// When the round trip completed.
    pub settled_at: DateTime<Utc>,
}

impl Confirmation {
    /// Acknowledge `request` as settled now.
    pub fn for_request(request: &OrderRequest) -> Self {
        Self {
            order_id: request.id,
            side: request.side,
            amount: request.amount,
            settled_at: Utc::now(),
        }
    }
}
