use crate::output;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use config::{Config, ConfigLayer};
use nm_core::{MetricStore, NewMetric, NewService, OwnerContext, OwnerId, TimestampMs};
use observability::{AnomalyDetector, DetectionRequest, DetectionResult, DetectorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use storage::InMemoryMetricStore;
use tracing::info;

#[derive(Args)]
pub struct DetectArgs {
    #[arg(
        long,
        help = "JSON file with an array of {\"value\", \"timestamp\"?} readings"
    )]
    pub input: PathBuf,

    #[arg(long, help = "Service name")]
    pub service: String,

    #[arg(long, help = "Metric name")]
    pub metric: String,

    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Trailing window in seconds"
    )]
    pub window_seconds: Option<i64>,

    #[arg(long, allow_negative_numbers = true, help = "Sigma threshold")]
    pub sigma: Option<f64>,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, help = "Print Prometheus metrics after the result")]
    pub metrics: bool,
}

/// One reading in the input file. The timestamp is milliseconds since the
/// epoch or an RFC 3339 string; omitted means "now".
#[derive(Debug, Deserialize)]
pub struct InputReading {
    pub value: f64,
    #[serde(default)]
    pub timestamp: Option<InputTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InputTimestamp {
    Millis(i64),
    Rfc3339(DateTime<Utc>),
}

impl From<&InputTimestamp> for TimestampMs {
    fn from(ts: &InputTimestamp) -> Self {
        match ts {
            InputTimestamp::Millis(ms) => TimestampMs::from_millis(*ms),
            InputTimestamp::Rfc3339(dt) => TimestampMs::from_datetime(*dt),
        }
    }
}

pub fn read_input(path: &Path) -> Result<Vec<InputReading>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub async fn run(args: DetectArgs, config: &Config) -> Result<()> {
    let prometheus = if args.metrics && config.observability.metrics_enabled {
        Some(
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .context("installing metrics recorder")?,
        )
    } else {
        None
    };

    let readings = read_input(&args.input)?;
    let store = InMemoryMetricStore::new(config.storage.clone());
    let Some(owner_id) = OwnerId::new(config.identity.owner_id.clone()) else {
        bail!("invalid owner id '{}'", config.identity.owner_id);
    };
    let ctx = OwnerContext::new(owner_id);

    let service = store
        .create_service(
            &ctx,
            NewService {
                name: args.service.clone(),
                description: None,
            },
        )
        .await?;
    let metric = store
        .create_metric(
            &ctx,
            NewMetric {
                service_id: service.id,
                name: args.metric.clone(),
                description: None,
            },
        )
        .await?;

    for reading in &readings {
        store
            .append_reading(
                &ctx,
                &metric.id,
                reading.value,
                reading.timestamp.as_ref().map(TimestampMs::from),
            )
            .await?;
    }
    info!(count = readings.len(), metric = %args.metric, "Replayed readings");
    if !args.json {
        output::info(&format!(
            "replayed {} readings from {}",
            readings.len(),
            args.input.display()
        ));
    }

    let detector = AnomalyDetector::new(DetectorConfig::from(&config.detection));
    let result = detector
        .detect(
            &store,
            &ctx,
            &service.id,
            &args.metric,
            DetectionRequest {
                window_seconds: args.window_seconds,
                sigma_threshold: args.sigma,
            },
        )
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&args, &result);
    }

    if let Some(handle) = prometheus {
        println!("{}", handle.render());
    }
    Ok(())
}

fn print_result(args: &DetectArgs, result: &DetectionResult) {
    output::header(&format!("{} / {}", args.service, args.metric));
    let timestamp = result
        .timestamp
        .to_datetime()
        .map_or_else(|| result.timestamp.to_string(), |dt| dt.to_rfc3339());
    output::field("timestamp", timestamp);
    output::field("value", result.value);
    output::field("mean", format!("{:.2}", result.window_mean));
    output::field("stddev", format!("{:.2}", result.window_stddev));
    output::field("window", format!("{} readings", result.window_len));
    println!();

    match (result.anomaly_type, result.severity) {
        (Some(kind), Some(severity)) => output::anomaly(&format!("{kind} ({severity} severity)")),
        _ => output::success("within bounds"),
    }
}

/// Window and sigma flags as a config layer for the precedence merge.
pub fn overrides(args: &DetectArgs) -> Option<ConfigLayer> {
    let mut layer = ConfigLayer::default();
    layer.detection.default_window_seconds = args.window_seconds;
    layer.detection.default_sigma_threshold = args.sigma;
    (!layer.is_empty()).then_some(layer)
}
