//! Metrics Adapter
//!
//! Prometheus registry for submission and proxy observability. The
//! text exposition is served at `/metrics` by the HTTP adapter.

pub mod prometheus;

pub use prometheus::MetricsRegistry;
