//! Prometheus metrics for kindsearch
//!
//! This module provides observability through Prometheus-compatible metrics
//! for federated searches, per-source failures, and boost resolution.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Search metrics
    // ============================================================================

    /// Total number of federated search requests
    pub static ref SEARCH_REQUESTS: Counter = Counter::with_opts(
        Opts::new(
            "kindsearch_search_requests_total",
            "Total number of federated search requests"
        )
    ).expect("Failed to create SEARCH_REQUESTS counter");

    /// Federated search latency in seconds
    pub static ref SEARCH_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "kindsearch_search_latency_seconds",
            "Federated search latency in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])
    ).expect("Failed to create SEARCH_LATENCY histogram");

    /// Number of merged results returned per request
    pub static ref SEARCH_RESULTS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "kindsearch_search_results_count",
            "Number of merged results returned per request"
        ).buckets(vec![0.0, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0])
    ).expect("Failed to create SEARCH_RESULTS histogram");

    /// Searches that failed on every source
    pub static ref SEARCH_FAILURES: Counter = Counter::with_opts(
        Opts::new(
            "kindsearch_search_failures_total",
            "Federated searches where every source failed"
        )
    ).expect("Failed to create SEARCH_FAILURES counter");

    // ============================================================================
    // Source metrics
    // ============================================================================

    /// Branch failures per source ("author" or "news")
    pub static ref SOURCE_FAILURES: CounterVec = CounterVec::new(
        Opts::new(
            "kindsearch_source_failures_total",
            "Source branch failures degraded to partial results"
        ),
        &["source"]
    ).expect("Failed to create SOURCE_FAILURES counter");

    /// Boost resolutions by outcome ("hit", "miss", "error")
    pub static ref BOOST_RESOLUTIONS: CounterVec = CounterVec::new(
        Opts::new(
            "kindsearch_boost_resolutions_total",
            "Boost name resolutions by outcome"
        ),
        &["outcome"]
    ).expect("Failed to create BOOST_RESOLUTIONS counter");
}

/// Register all metrics with the global registry
///
/// This function should be called once at application startup.
/// Panics if metrics registration fails.
pub fn register_metrics() {
    REGISTRY
        .register(Box::new(SEARCH_REQUESTS.clone()))
        .expect("Failed to register SEARCH_REQUESTS");
    REGISTRY
        .register(Box::new(SEARCH_LATENCY.clone()))
        .expect("Failed to register SEARCH_LATENCY");
    REGISTRY
        .register(Box::new(SEARCH_RESULTS.clone()))
        .expect("Failed to register SEARCH_RESULTS");
    REGISTRY
        .register(Box::new(SEARCH_FAILURES.clone()))
        .expect("Failed to register SEARCH_FAILURES");
    REGISTRY
        .register(Box::new(SOURCE_FAILURES.clone()))
        .expect("Failed to register SOURCE_FAILURES");
    REGISTRY
        .register(Box::new(BOOST_RESOLUTIONS.clone()))
        .expect("Failed to register BOOST_RESOLUTIONS");
}

/// Gather all metrics and encode them in Prometheus text format
///
/// Returns an empty string if encoding fails (which should not happen with valid metrics).
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Metrics contained invalid UTF-8: {}", e);
        String::new()
    })
}
