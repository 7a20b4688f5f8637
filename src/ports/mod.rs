//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `TradeTransport`: Order submission round trip
//! - `TradeListener`: Host page completion callback
//! - `MarketApi`: Upstream market data for the proxy

pub mod listener;
pub mod market_api;
pub mod transport;

pub use listener::TradeListener;
pub use market_api::MarketApi;
pub use transport::{SubmissionFailed, TradeTransport};
