// Prometheus metrics definitions for the Blipp backend.

use std::time::Duration;

use lazy_static::lazy_static;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    /// Total API requests, by method/endpoint/status.
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("blipp_api_requests_total", "Total API requests"),
        &["method", "endpoint", "status"],
    )
    .unwrap();

    /// API request duration in seconds, by endpoint.
    pub static ref API_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "blipp_api_request_duration_seconds",
            "API request duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
        &["endpoint"],
    )
    .unwrap();

    /// Robot state writes accepted.
    pub static ref ROBOT_STATE_UPDATES_TOTAL: IntCounter = IntCounter::new(
        "blipp_robot_state_updates_total",
        "Robot state writes accepted",
    )
    .unwrap();

    /// Inventory items inserted through the API.
    pub static ref INVENTORY_ITEMS_ADDED_TOTAL: IntCounter = IntCounter::new(
        "blipp_inventory_items_added_total",
        "Inventory items added",
    )
    .unwrap();

    /// Random item lookups that found nothing and returned the placeholder.
    pub static ref RANDOM_ITEM_FALLBACKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("blipp_random_item_fallbacks_total", "Random lookups answered with the placeholder item"),
        &["source"],
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(API_REQUESTS_TOTAL.clone()),
        Box::new(API_REQUEST_DURATION_SECONDS.clone()),
        Box::new(ROBOT_STATE_UPDATES_TOTAL.clone()),
        Box::new(INVENTORY_ITEMS_ADDED_TOTAL.clone()),
        Box::new(RANDOM_ITEM_FALLBACKS_TOTAL.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_request(method: &str, endpoint: &str, status: u16, elapsed: Duration) {
    let status = status.to_string();
    API_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, status.as_str()])
        .inc();
    API_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint])
        .observe(elapsed.as_secs_f64());
}
