//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! trading page's workflows. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `OrderSubmitter`: Single-flight submission state machine
//! - `TradingPanel`: Stake entry, payout preview and submit for one side
//! - `MarketDetail`: Market header, probability bar and both panels

pub mod market_detail;
pub mod order_submitter;
pub mod trading_panel;

pub use market_detail::{MarketDetail, MarketDetailView, logging_listener};
pub use order_submitter::{OrderSubmitter, SubmissionState};
pub use trading_panel::{PanelView, SubmitError, TradingPanel};
