use metrics::{counter, histogram};

/// Metric emission for anomaly detection.
pub struct DetectionTelemetry;

impl DetectionTelemetry {
    pub fn record_detection(outcome: &str, window_len: usize) {
        counter!("neonomaly_detections_total", "outcome" => outcome.to_string()).increment(1);
        histogram!("neonomaly_detection_window_size").record(window_len as f64);
    }

    pub fn record_anomaly(anomaly_type: &str) {
        counter!("neonomaly_anomalies_total", "type" => anomaly_type.to_string()).increment(1);
    }

    pub fn record_no_data() {
        counter!("neonomaly_detections_total", "outcome" => "no_data").increment(1);
    }
}
