use opentelemetry::metrics::{Counter, Histogram};
use opentelemetry::{global, KeyValue};
use std::sync::OnceLock;
use std::time::Instant;

/// OpenTelemetry metrics for service observability.
///
/// Tracks HTTP requests, storage operations, and errors. Singleton
/// instance accessed via `Metrics::get()`.
pub struct Metrics {
    // Request-level metrics
    pub requests_total: Counter<u64>,
    pub request_duration: Histogram<f64>,
    pub errors_total: Counter<u64>,

    // Storage backend metrics
    pub storage_operations_total: Counter<u64>,
    pub storage_errors_total: Counter<u64>,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

impl Metrics {
    pub fn init() -> &'static Self {
        METRICS.get_or_init(|| {
            let meter = global::meter("pokedex-api");

            Metrics {
                requests_total: meter
                    .u64_counter("pokedex_requests_total")
                    .with_description("Total number of HTTP requests processed")
                    .init(),

                request_duration: meter
                    .f64_histogram("pokedex_request_duration_seconds")
                    .with_description("Request processing duration in seconds")
                    .init(),

                errors_total: meter
                    .u64_counter("pokedex_errors_total")
                    .with_description("Total number of request errors")
                    .init(),

                storage_operations_total: meter
                    .u64_counter("pokedex_storage_operations_total")
                    .with_description("Total number of storage operations")
                    .init(),

                storage_errors_total: meter
                    .u64_counter("pokedex_storage_errors_total")
                    .with_description("Total number of storage backend faults")
                    .init(),
            }
        })
    }

    pub fn get() -> &'static Self {
        Self::init()
    }

    // Helper methods for common metric operations
    pub fn record_request(&self, method: &str, path: &str, duration: f64) {
        let labels = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("path", path.to_string()),
        ];
        self.requests_total.add(1, labels);
        self.request_duration.record(duration, labels);
    }

    pub fn record_error(&self, status: u16) {
        self.errors_total
            .add(1, &[KeyValue::new("status", i64::from(status))]);
    }

    pub fn record_storage_operation(&self, operation: &str) {
        self.storage_operations_total
            .add(1, &[KeyValue::new("operation", operation.to_string())]);
    }

    pub fn record_storage_error(&self, operation: &str) {
        self.storage_errors_total
            .add(1, &[KeyValue::new("operation", operation.to_string())]);
    }
}

// Timer utility for measuring durations
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
