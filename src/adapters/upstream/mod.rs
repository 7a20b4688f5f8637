//! Upstream Market API Adapter
//!
//! HTTP client forwarding proxy requests to the public market API.

pub mod client;

pub use client::{UpstreamClient, UpstreamClientConfig};
