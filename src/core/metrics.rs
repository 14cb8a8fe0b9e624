//! Prometheus metrics for monitoring the gateway.
//!
//! This module provides a centralized metrics registry tracking HTTP traffic,
//! generation outcomes, quota rejections and registrations.

use prometheus::{
    register_gauge_vec, register_histogram_vec, register_int_counter_vec, GaugeVec, HistogramVec,
    IntCounterVec,
};
use std::sync::OnceLock;

/// Container for all application metrics.
pub struct Metrics {
    /// Total number of requests by method, endpoint and status
    pub request_count: IntCounterVec,

    /// Request duration histogram in seconds
    pub request_duration: HistogramVec,

    /// Number of currently active requests by endpoint
    pub active_requests: GaugeVec,

    /// Completion calls by capability and outcome ("success" / "error")
    pub generations: IntCounterVec,

    /// Requests rejected by the daily quota, by plan
    pub quota_rejections: IntCounterVec,

    /// Accounts registered, by plan
    pub registrations: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Initialize the metrics registry.
///
/// Safe to call more than once; later calls return the same instance.
///
/// # Examples
///
/// ```no_run
/// use ai_agent_gateway::core::metrics::init_metrics;
///
/// let metrics = init_metrics();
/// metrics.request_count.with_label_values(&["GET", "/health", "200"]).inc();
/// ```
pub fn init_metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let request_count = register_int_counter_vec!(
            "gateway_requests_total",
            "Total number of requests",
            &["method", "endpoint", "status_code"]
        )
        .expect("Failed to register request_count metric");

        let request_duration = register_histogram_vec!(
            "gateway_request_duration_seconds",
            "Request duration in seconds",
            &["method", "endpoint"],
            vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]
        )
        .expect("Failed to register request_duration metric");

        let active_requests = register_gauge_vec!(
            "gateway_active_requests",
            "Number of active requests",
            &["endpoint"]
        )
        .expect("Failed to register active_requests metric");

        let generations = register_int_counter_vec!(
            "gateway_generations_total",
            "Completion calls by capability and outcome",
            &["capability", "outcome"]
        )
        .expect("Failed to register generations metric");

        let quota_rejections = register_int_counter_vec!(
            "gateway_quota_rejections_total",
            "Requests rejected by the daily quota",
            &["plan"]
        )
        .expect("Failed to register quota_rejections metric");

        let registrations = register_int_counter_vec!(
            "gateway_registrations_total",
            "Accounts registered",
            &["plan"]
        )
        .expect("Failed to register registrations metric");

        Metrics {
            request_count,
            request_duration,
            active_requests,
            generations,
            quota_rejections,
            registrations,
        }
    })
}

/// Get the global metrics instance, initializing it on first use.
pub fn get_metrics() -> &'static Metrics {
    init_metrics()
}
