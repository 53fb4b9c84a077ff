//! Metrics collection.
//!
//! # Metrics
//! - `routing_repository_operations_total` (counter): repository calls by
//!   `operation` and `outcome` (ok, not_found, invalid, storage_error)

/// Count one repository operation.
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "routing_repository_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
