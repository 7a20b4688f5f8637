//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP server and client, timers, Prometheus).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `http`: axum host API, health probes and the `/api/*` proxy
//! - `metrics`: Prometheus metrics registry
//! - `transport`: simulated and metered order transports
//! - `upstream`: reqwest client for the upstream market API

pub mod http;
pub mod metrics;
pub mod transport;
pub mod upstream;
