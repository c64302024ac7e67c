// Metrics and observability module
// This file registers the Prometheus series for provider latency, provider
// failures and routing outcomes, and renders them for scraping
//
// Numan Thabit 2025 Nov

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

pub static PROVIDER_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "router_provider_latency_seconds",
        "latency of liquidity provider quote calls",
        &["provider"]
    )
    .unwrap()
});

pub static PROVIDER_FAILURES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "router_provider_failures_total",
        "failed or rejected quotes by provider",
        &["provider"]
    )
    .unwrap()
});

pub static ROUTE_DECISIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "router_decisions_total",
        "routing attempts by strategy, outcome and failure code",
        &["strategy", "outcome", "code"]
    )
    .unwrap()
});

/// Text exposition of the default registry.
pub fn render() -> String {
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buf) {
        tracing::warn!(error = %err, "failed to encode metrics");
    }
    String::from_utf8(buf).unwrap_or_default()
}
