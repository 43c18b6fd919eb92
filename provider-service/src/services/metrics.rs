//! Prometheus metrics for provider-service.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

pub use service_core::observability::render_metrics as get_metrics;

pub const DB_QUERY_DURATION: &str = "provider_db_query_duration_seconds";
pub const PROVIDER_CHANGES_TOTAL: &str = "provider_changes_total";

pub fn init_metrics() {
    service_core::observability::init_metrics();

    describe_histogram!(DB_QUERY_DURATION, "Database query duration in seconds");
    describe_counter!(PROVIDER_CHANGES_TOTAL, "Provider writes, by operation");
}

pub struct QueryTimer {
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn observe_duration(self) {
        histogram!(DB_QUERY_DURATION, "operation" => self.operation)
            .record(self.start.elapsed().as_secs_f64());
    }
}

pub fn record_change(operation: &'static str) {
    counter!(PROVIDER_CHANGES_TOTAL, "operation" => operation).increment(1);
}
