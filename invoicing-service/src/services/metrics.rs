//! Prometheus metrics for invoicing-service.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

pub use service_core::observability::render_metrics as get_metrics;

pub const DB_QUERY_DURATION: &str = "invoicing_db_query_duration_seconds";
pub const INVOICES_TOTAL: &str = "invoicing_invoices_total";
pub const ITEM_MUTATIONS_TOTAL: &str = "invoicing_item_mutations_total";
pub const RECALCULATIONS_TOTAL: &str = "invoicing_recalculations_total";

/// Install the recorder and register metric descriptions.
pub fn init_metrics() {
    service_core::observability::init_metrics();

    describe_histogram!(DB_QUERY_DURATION, "Database query duration in seconds");
    describe_counter!(INVOICES_TOTAL, "Invoices created, by creation path");
    describe_counter!(ITEM_MUTATIONS_TOTAL, "Invoice item mutations, by operation");
    describe_counter!(RECALCULATIONS_TOTAL, "Invoice total recalculations");
}

/// Times one database operation.
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

pub fn record_invoice_created(path: &'static str) {
    counter!(INVOICES_TOTAL, "path" => path).increment(1);
}

pub fn record_item_mutation(operation: &'static str) {
    counter!(ITEM_MUTATIONS_TOTAL, "operation" => operation).increment(1);
}

pub fn record_recalculation() {
    counter!(RECALCULATIONS_TOTAL).increment(1);
}
