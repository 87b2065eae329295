//! JSON shapes returned by the tools.
//!
//! Identifiers render as strings, timestamps as RFC 3339 and absent
//! descriptions as an empty string.

use nm_core::{Metric, MetricReading, MetricSummary, Service, TimestampMs};
use observability::DetectionResult;
use serde::Serialize;

fn rfc3339(timestamp: TimestampMs) -> Option<String> {
    timestamp.to_datetime().map(|dt| dt.to_rfc3339())
}

#[derive(Debug, Serialize)]
pub struct ServiceView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub owner_id: String,
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.to_string(),
            name: service.name.clone(),
            description: service.description.clone().unwrap_or_default(),
            created_at: service.created_at.to_rfc3339(),
            owner_id: service.owner_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadingView {
    pub id: String,
    pub value: f64,
    pub timestamp: Option<String>,
}

impl From<&MetricReading> for ReadingView {
    fn from(reading: &MetricReading) -> Self {
        Self {
            id: reading.id.to_string(),
            value: reading.value,
            timestamp: rfc3339(reading.timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_reading: Option<Option<ReadingView>>,
}

impl MetricView {
    /// A freshly registered metric, without the reading slot.
    pub fn registered(metric: &Metric) -> Self {
        Self {
            id: metric.id.to_string(),
            name: metric.name.clone(),
            description: metric.description.clone().unwrap_or_default(),
            service_id: metric.service_id.to_string(),
            latest_reading: None,
        }
    }

    /// A listed metric; `latest_reading` is always present, `null` when the
    /// metric has no readings.
    pub fn listed(summary: &MetricSummary) -> Self {
        Self {
            latest_reading: Some(summary.latest_reading.as_ref().map(ReadingView::from)),
            ..Self::registered(&summary.metric)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnomalyView {
    pub timestamp: Option<String>,
    pub value: f64,
    pub window_mean: f64,
    pub window_std_dev: f64,
    pub is_anomaly: bool,
}

impl From<&DetectionResult> for AnomalyView {
    fn from(result: &DetectionResult) -> Self {
        Self {
            timestamp: rfc3339(result.timestamp),
            value: result.value,
            window_mean: utils::round2(result.window_mean),
            window_std_dev: utils::round2(result.window_stddev),
            is_anomaly: result.is_anomaly,
        }
    }
}
