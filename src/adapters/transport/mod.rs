//! Trade Transport Adapters
//!
//! Implementations of the `TradeTransport` port.
//!
//! - `simulated`: fixed-latency acknowledgment standing in for a venue
//! - `metered`: records submission metrics around any inner transport

pub mod metered;
pub mod simulated;

pub use metered::MeteredTransport;
pub use simulated::SimulatedTransport;
