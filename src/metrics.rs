// Metrics and observability module
// This file handles collection and reporting of quote latency,
// quote failures and degraded venues
//
// Numan Thabit 2025 Nov

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

pub static QUOTE_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "split_quote_latency_seconds",
        "latency of distribution quotes",
        &["outcome"]
    )
    .unwrap()
});

pub static QUOTE_ERRORS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "split_quote_errors_total",
        "failed quotes by error kind",
        &["kind"]
    )
    .unwrap()
});

pub static VENUE_UNAVAILABLE: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "split_venue_unavailable_total",
        "venue tables replaced by zero returns",
        &["venue"]
    )
    .unwrap()
});

/// Render the default registry in the prometheus text format
pub fn render() -> String {
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buf) {
        tracing::warn!(error = %err, "metrics encoding failed");
    }
    String::from_utf8(buf).unwrap_or_default()
}
