//! # Anomaly Detection Module
//!
//! Sigma-threshold detection over a trailing time window of a metric's
//! readings. Every request is a pure read of the chain as of the moment the
//! latest reading is fetched; nothing is cached between requests.

use crate::stats::WindowStats;
use crate::telemetry::DetectionTelemetry;
use crate::window;
use config::DetectionConfig;
use errors::DetectionError;
use nm_core::{MetricId, MetricStore, OwnerContext, ServiceId, TimestampMs};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, instrument, warn};

const DEFAULT_WINDOW_SECONDS: i64 = 600;
const DEFAULT_SIGMA_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Window used when a request does not name one.
    pub window_seconds: i64,
    /// Threshold used when a request does not name one.
    pub sigma_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            sigma_threshold: DEFAULT_SIGMA_THRESHOLD,
        }
    }
}

impl From<&DetectionConfig> for DetectorConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            window_seconds: config.default_window_seconds,
            sigma_threshold: config.default_sigma_threshold,
        }
    }
}

/// Per-request overrides. Values are taken as given; zero and negative
/// windows or thresholds are not rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionRequest {
    pub window_seconds: Option<i64>,
    pub sigma_threshold: Option<f64>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnomalyType {
    /// Value above the window mean
    Spike,
    /// Value below the window mean
    Drop,
}

impl AnomalyType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnomalySeverity {
    Low,    // up to 3 stddev
    Medium, // 3-4 stddev
    High,   // 4+ stddev
}

impl AnomalySeverity {
    fn from_deviation(deviation: Option<f64>) -> Self {
        match deviation {
            Some(d) if d > 4.0 => AnomalySeverity::High,
            Some(d) if d > 3.0 => AnomalySeverity::Medium,
            Some(_) => AnomalySeverity::Low,
            // Any deviation from a constant window.
            None => AnomalySeverity::High,
        }
    }
}

/// Outcome of one detection request, at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub metric_id: MetricId,
    pub timestamp: TimestampMs,
    pub value: f64,
    pub window_mean: f64,
    pub window_stddev: f64,
    pub window_len: usize,
    /// Distance from the mean in standard deviations; `None` when the window
    /// has zero spread.
    pub deviation_sigma: Option<f64>,
    pub is_anomaly: bool,
    pub anomaly_type: Option<AnomalyType>,
    pub severity: Option<AnomalySeverity>,
}

/// `|value - mean| > sigma_threshold * stddev`.
///
/// Strict, so a zero bound never fires on an exact match. Any `NaN` input
/// makes the comparison false.
pub fn classify(value: f64, mean: f64, stddev: f64, sigma_threshold: f64) -> bool {
    (value - mean).abs() > sigma_threshold * stddev
}

pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Check whether the latest reading of `metric_name` under `service_id`
    /// is an outlier against its trailing window.
    #[instrument(skip(self, store, ctx, request), fields(owner = %ctx.owner_id))]
    pub async fn detect(
        &self,
        store: &dyn MetricStore,
        ctx: &OwnerContext,
        service_id: &ServiceId,
        metric_name: &str,
        request: DetectionRequest,
    ) -> Result<DetectionResult, DetectionError> {
        let window_seconds = request.window_seconds.unwrap_or(self.config.window_seconds);
        let sigma_threshold = request
            .sigma_threshold
            .unwrap_or(self.config.sigma_threshold);

        let metric = store.find_metric(ctx, service_id, metric_name).await?;
        let chain = store.chain(ctx, &metric.id).await?;

        let readings = window::reconstruct(chain.as_ref(), window_seconds);
        let (Some(latest), Some(stats)) = (readings.first(), WindowStats::compute(&readings))
        else {
            DetectionTelemetry::record_no_data();
            return Err(DetectionError::NoData {
                metric: metric_name.to_string(),
            });
        };

        debug!(
            metric_id = %metric.id,
            window_seconds,
            count = stats.count,
            mean = stats.mean,
            stddev = stats.stddev,
            min = stats.min,
            max = stats.max,
            "Window statistics"
        );

        let result = Self::evaluate(
            metric.id,
            latest.value,
            latest.timestamp,
            &stats,
            sigma_threshold,
        );

        if let Some(anomaly_type) = result.anomaly_type {
            warn!(
                "Anomaly detected in {}: value={}, mean={:.2}, stddev={:.2}, threshold={}σ",
                metric_name, result.value, stats.mean, stats.stddev, sigma_threshold
            );
            DetectionTelemetry::record_anomaly(anomaly_type.as_str());
            DetectionTelemetry::record_detection("anomaly", stats.count);
        } else {
            DetectionTelemetry::record_detection("normal", stats.count);
        }

        Ok(result)
    }

    fn evaluate(
        metric_id: MetricId,
        value: f64,
        timestamp: TimestampMs,
        stats: &WindowStats,
        sigma_threshold: f64,
    ) -> DetectionResult {
        let is_anomaly = classify(value, stats.mean, stats.stddev, sigma_threshold);
        let deviation_sigma =
            (stats.stddev > 0.0).then(|| (value - stats.mean).abs() / stats.stddev);

        let (anomaly_type, severity) = if is_anomaly {
            let anomaly_type = if value > stats.mean {
                AnomalyType::Spike
            } else {
                AnomalyType::Drop
            };
            (
                Some(anomaly_type),
                Some(AnomalySeverity::from_deviation(deviation_sigma)),
            )
        } else {
            (None, None)
        };

        DetectionResult {
            metric_id,
            timestamp,
            value,
            window_mean: stats.mean,
            window_stddev: stats.stddev,
            window_len: stats.count,
            deviation_sigma,
            is_anomaly,
            anomaly_type,
            severity,
        }
    }
}
