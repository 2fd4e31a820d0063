// Private module declaration
mod server;

use prometheus::{
    Counter, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::order::OrderStatus;

// Re-export for public API
pub use server::{configure, track_requests};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - HTTP traffic (count and latency per route pattern)
// - Checkout outcomes (orders placed, value, rejections by reason)
// - Order status changes
// - Retry attempts and outcomes at startup
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: IntCounterVec,
    pub http_request_duration: HistogramVec,

    // Order Metrics
    pub orders_created: IntCounter,
    pub order_value_total: Counter,
    pub order_rejections: IntCounterVec,
    pub order_status_changes: IntCounterVec,

    // Retry Metrics
    pub retry_attempts_total: IntCounterVec,
    pub retry_success: IntCounterVec,
    pub retry_failure: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests handled"),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["method", "route"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        // Order Metrics
        let orders_created = IntCounter::new("orders_created_total", "Total orders placed")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_value_total =
            Counter::new("order_value_total", "Sum of totals of all placed orders")?;
        registry.register(Box::new(order_value_total.clone()))?;

        let order_rejections = IntCounterVec::new(
            Opts::new("order_rejections_total", "Checkouts rejected before persisting"),
            &["reason"],
        )?;
        registry.register(Box::new(order_rejections.clone()))?;

        let order_status_changes = IntCounterVec::new(
            Opts::new("order_status_changes_total", "Order status changes by new status"),
            &["status"],
        )?;
        registry.register(Box::new(order_status_changes.clone()))?;

        // Retry Metrics
        let retry_attempts_total = IntCounterVec::new(
            Opts::new("retry_attempts_total", "Total retry attempts"),
            &["operation", "attempt"],
        )?;
        registry.register(Box::new(retry_attempts_total.clone()))?;

        let retry_success = IntCounterVec::new(
            Opts::new("retry_success_total", "Total successful retries"),
            &["operation"],
        )?;
        registry.register(Box::new(retry_success.clone()))?;

        let retry_failure = IntCounterVec::new(
            Opts::new("retry_failure_total", "Total failed retries after all attempts"),
            &["operation"],
        )?;
        registry.register(Box::new(retry_failure.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
            orders_created,
            order_value_total,
            order_rejections,
            order_status_changes,
            retry_attempts_total,
            retry_success,
            retry_failure,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode every registered metric in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        Ok(TextEncoder::new().encode_to_string(&self.registry.gather())?)
    }

    /// Helper to record a finished HTTP request
    pub fn record_http_request(&self, method: &str, route: &str, status: u16, duration_secs: f64) {
        self.http_requests_total
            .with_label_values(&[method, route, &status.to_string()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, route])
            .observe(duration_secs);
    }

    /// Helper to record a placed order
    pub fn record_order_created(&self, total: Decimal) {
        self.orders_created.inc();
        self.order_value_total.inc_by(total.to_f64().unwrap_or_default());
    }

    pub fn record_order_rejected(&self, reason: &str) {
        self.order_rejections.with_label_values(&[reason]).inc();
    }

    pub fn record_status_change(&self, status: OrderStatus) {
        self.order_status_changes.with_label_values(&[status.as_str()]).inc();
    }

    /// Helper to record retry attempt
    pub fn record_retry_attempt(&self, operation: &str, attempt: u32) {
        self.retry_attempts_total.with_label_values(&[operation, &attempt.to_string()]).inc();
    }

    /// Helper to record retry outcome
    pub fn record_retry_outcome(&self, operation: &str, success: bool) {
        if success {
            self.retry_success.with_label_values(&[operation]).inc();
        } else {
            self.retry_failure.with_label_values(&[operation]).inc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(!metrics.registry().gather().is_empty());
    }

    #[test]
    fn test_record_order_created() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_created(Decimal::new(14650, 2));
        metrics.record_order_created(Decimal::from(200));

        let text = metrics.render().unwrap();
        assert!(text.contains("orders_created_total 2"));
        assert!(text.contains("order_value_total 346.5"));
    }

    #[test]
    fn test_record_rejections_by_reason() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_rejected("empty_items");
        metrics.record_order_rejected("empty_items");
        metrics.record_order_rejected("invalid_outlet");

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"order_rejections_total{reason="empty_items"} 2"#));
        assert!(text.contains(r#"order_rejections_total{reason="invalid_outlet"} 1"#));
    }

    #[test]
    fn test_record_http_request() {
        let metrics = Metrics::new().unwrap();
        metrics.record_http_request("GET", "/api/outlets", 200, 0.002);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"http_requests_total{method="GET",route="/api/outlets",status="200"} 1"#));
    }

    #[test]
    fn test_record_retry() {
        let metrics = Metrics::new().unwrap();
        metrics.record_retry_attempt("db_connect", 1);
        metrics.record_retry_attempt("db_connect", 2);
        metrics.record_retry_outcome("db_connect", true);

        let gathered = metrics.registry().gather();
        let attempts = gathered.iter().find(|m| m.name() == "retry_attempts_total").unwrap();
        assert_eq!(attempts.metric.len(), 2); // Two different attempt labels
    }
}
