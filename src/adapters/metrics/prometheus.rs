//! Prometheus Metrics Registry - Order Entry Observability
//!
//! Registers the counters, gauges and histograms behind the trading
//! page: submissions per side and outcome, settlement latency, panels
//! currently pending, and upstream proxy traffic.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

use crate::domain::market::Side;

/// Centralized Prometheus metrics for the trading page.
///
/// All metrics follow the naming convention `market_panel_*` and carry a
/// `side` label where they concern one panel.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Submissions that entered Pending.
    pub submissions_accepted: IntCounterVec,
    /// Submits ignored because the panel was already pending.
    pub submissions_ignored: IntCounterVec,
    /// Submissions that settled and reached the listener.
    pub submissions_settled: IntCounterVec,
    /// Submissions whose round trip failed.
    pub submissions_failed: IntCounterVec,
    /// Submits rejected before Pending (invalid stake or payout).
    pub submissions_rejected: IntCounterVec,
    /// Round-trip latency in seconds.
    pub settlement_latency: HistogramVec,
    /// Panels currently pending (0 or 1 per side).
    pub pending: IntGaugeVec,
    /// Upstream proxy requests by outcome.
    pub proxy_requests: IntCounterVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let submissions_accepted = IntCounterVec::new(
            Opts::new(
                "market_panel_submissions_accepted_total",
                "Submissions that entered Pending",
            ),
            &["side"],
        )?;

        let submissions_ignored = IntCounterVec::new(
            Opts::new(
                "market_panel_submissions_ignored_total",
                "Submits ignored while a submission was pending",
            ),
            &["side"],
        )?;

        let submissions_settled = IntCounterVec::new(
            Opts::new(
                "market_panel_submissions_settled_total",
                "Submissions that settled",
            ),
            &["side"],
        )?;

        let submissions_failed = IntCounterVec::new(
            Opts::new(
                "market_panel_submissions_failed_total",
                "Submissions whose round trip failed",
            ),
            &["side"],
        )?;

        let submissions_rejected = IntCounterVec::new(
            Opts::new(
                "market_panel_submissions_rejected_total",
                "Submits rejected for an invalid stake or payout",
            ),
            &["side", "reason"],
        )?;

        let settlement_latency = HistogramVec::new(
            HistogramOpts::new(
                "market_panel_settlement_latency_seconds",
                "Submission round-trip latency in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0]),
            &["side"],
        )?;

        let pending = IntGaugeVec::new(
            Opts::new("market_panel_pending", "Whether a panel has a submission in flight"),
            &["side"],
        )?;

        let proxy_requests = IntCounterVec::new(
            Opts::new(
                "market_panel_proxy_requests_total",
                "Upstream API requests forwarded by the proxy",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(submissions_accepted.clone()))?;
        registry.register(Box::new(submissions_ignored.clone()))?;
        registry.register(Box::new(submissions_settled.clone()))?;
        registry.register(Box::new(submissions_failed.clone()))?;
        registry.register(Box::new(submissions_rejected.clone()))?;
        registry.register(Box::new(settlement_latency.clone()))?;
        registry.register(Box::new(pending.clone()))?;
        registry.register(Box::new(proxy_requests.clone()))?;

        // Expose both sides from the first scrape.
        for side in Side::ALL {
            pending.with_label_values(&[side.as_str()]).set(0);
        }

        Ok(Self {
            registry,
            submissions_accepted,
            submissions_ignored,
            submissions_settled,
            submissions_failed,
            submissions_rejected,
            settlement_latency,
            pending,
            proxy_requests,
        })
    }

    /// Encode every registered metric in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
