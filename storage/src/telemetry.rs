use metrics::{counter, histogram};

/// Metric emission for the storage layer.
///
/// Emission is unconditional; without an installed recorder the macros are
/// no-ops.
pub struct StorageTelemetry;

impl StorageTelemetry {
    pub fn record_service_created() {
        counter!("neonomaly_services_created_total").increment(1);
    }

    pub fn record_metric_created() {
        counter!("neonomaly_metrics_created_total").increment(1);
    }

    pub fn record_reading_appended(chain_len: usize) {
        counter!("neonomaly_readings_appended_total").increment(1);
        histogram!("neonomaly_chain_length").record(chain_len as f64);
    }

    pub fn record_rejection(operation: &str, kind: &str) {
        counter!(
            "neonomaly_storage_rejections_total",
            "operation" => operation.to_string(),
            "kind" => kind.to_string()
        )
        .increment(1);
    }
}
