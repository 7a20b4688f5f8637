//! Domain layer - Pricing, stake and market models.
//!
//! Pure, synchronous logic for the order-entry panels: the market record,
//! price display, payout math and stake selection. Nothing here touches
//! I/O or the async runtime, so every type is testable in isolation.

pub mod format;
pub mod market;
pub mod pricing;
pub mod stake;

// Re-export core types for convenience
pub use format::{format_count, format_price, format_usd};
pub use market::{Confirmation, Market, OrderRequest, Side};
pub use pricing::{PriceModel, PricingError, potential_winnings};
pub use stake::{InvalidStake, Preset, Stake, StakeSelector};
