use errors::{DetectionError, ErrorKind};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use nm_core::{MetricStore, NewMetric, NewService, OwnerContext, ServiceId, TimestampMs};
use observability::{
    AnomalyDetector, AnomalySeverity, AnomalyType, DetectionRequest, DetectionResult,
    DetectionTelemetry,
};
use storage::InMemoryMetricStore;

async fn seeded(points: &[(f64, i64)]) -> (InMemoryMetricStore, ServiceId) {
    let store = InMemoryMetricStore::default();
    let ctx = OwnerContext::default();
    let service = store
        .create_service(
            &ctx,
            NewService {
                name: "payments".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let metric = store
        .create_metric(
            &ctx,
            NewMetric {
                service_id: service.id,
                name: "latency".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    for (value, ts) in points {
        store
            .append_reading(
                &ctx,
                &metric.id,
                *value,
                Some(TimestampMs::from_millis(*ts)),
            )
            .await
            .unwrap();
    }
    (store, service.id)
}

async fn detect(
    store: &InMemoryMetricStore,
    service_id: &ServiceId,
    request: DetectionRequest,
) -> Result<DetectionResult, DetectionError> {
    let ctx = OwnerContext::default();
    AnomalyDetector::default()
        .detect(store, &ctx, service_id, "latency", request)
        .await
}

async fn detected(
    store: &InMemoryMetricStore,
    service_id: &ServiceId,
    request: DetectionRequest,
) -> DetectionResult {
    detect(store, service_id, request).await.unwrap()
}

fn request(window_seconds: i64, sigma_threshold: f64) -> DetectionRequest {
    DetectionRequest {
        window_seconds: Some(window_seconds),
        sigma_threshold: Some(sigma_threshold),
    }
}

#[tokio::test]
async fn test_scenario_a_single_spike_inside_wide_spread() {
    let (store, service_id) =
        seeded(&[(10.0, 0), (10.0, 1_000), (10.0, 2_000), (100.0, 3_000)]).await;
    let result = detected(&store, &service_id, request(10, 3.0)).await;

    assert_eq!(result.window_len, 4);
    assert_eq!(result.value, 100.0);
    assert_eq!(result.timestamp, TimestampMs::from_millis(3_000));
    assert_eq!(result.window_mean, 32.5);
    assert!((result.window_stddev - 38.97).abs() < 0.01);
    assert!(!result.is_anomaly);
    assert!(result.anomaly_type.is_none());
}

#[tokio::test]
async fn test_scenario_b_constant_window_is_not_anomalous() {
    let points: Vec<(f64, i64)> = (0..=5).map(|i| (10.0, i * 1_000)).collect();
    let (store, service_id) = seeded(&points).await;
    let result = detected(&store, &service_id, request(600, 3.0)).await;

    assert_eq!(result.window_len, 6);
    assert_eq!(result.window_mean, 10.0);
    assert_eq!(result.window_stddev, 0.0);
    assert!(result.deviation_sigma.is_none());
    assert!(!result.is_anomaly);
}

#[tokio::test]
async fn test_flat_window_of_inexact_value_is_not_anomalous_below_one_sigma() {
    let (store, service_id) = seeded(&[(0.1, 0), (0.1, 1_000), (0.1, 2_000)]).await;
    let result = detected(&store, &service_id, request(600, 0.5)).await;

    assert_eq!(result.window_len, 3);
    assert_eq!(result.window_mean, 0.1);
    assert_eq!(result.window_stddev, 0.0);
    assert!(result.deviation_sigma.is_none());
    assert!(!result.is_anomaly);
    assert!(result.severity.is_none());
}

#[tokio::test]
async fn test_scenario_c_no_readings_is_no_data() {
    let (store, service_id) = seeded(&[]).await;
    let err = detect(&store, &service_id, DetectionRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DetectionError::NoData { .. }));
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[tokio::test]
async fn test_scenario_d_zero_window_uses_latest_only() {
    let (store, service_id) = seeded(&[(1.0, 0), (50.0, 1_000), (999.0, 2_000)]).await;
    for sigma in [0.0, 3.0, -0.0] {
        let result = detected(&store, &service_id, request(0, sigma)).await;
        assert_eq!(result.window_len, 1);
        assert_eq!(result.window_mean, 999.0);
        assert_eq!(result.window_stddev, 0.0);
        assert!(!result.is_anomaly);
    }
}

#[tokio::test]
async fn test_spike_classified_with_severity() {
    let mut points: Vec<(f64, i64)> = (0..20)
        .map(|i| (100.0 + f64::from(i % 2), i64::from(i) * 1_000))
        .collect();
    points.push((500.0, 20_000));
    let (store, service_id) = seeded(&points).await;

    let result = detected(&store, &service_id, request(600, 3.0)).await;
    assert!(result.is_anomaly);
    assert_eq!(result.anomaly_type, Some(AnomalyType::Spike));
    assert_eq!(result.severity, Some(AnomalySeverity::High));
}

#[tokio::test]
async fn test_drop_classified() {
    let mut points: Vec<(f64, i64)> = (0..20)
        .map(|i| (100.0 + f64::from(i % 2), i64::from(i) * 1_000))
        .collect();
    points.push((10.0, 20_000));
    let (store, service_id) = seeded(&points).await;

    let result = detected(&store, &service_id, request(600, 3.0)).await;
    assert!(result.is_anomaly);
    assert_eq!(result.anomaly_type, Some(AnomalyType::Drop));
}

#[tokio::test]
async fn test_detection_is_idempotent() {
    let (store, service_id) = seeded(&[(3.0, 0), (7.0, 1_000), (4.0, 2_000)]).await;
    let detector = AnomalyDetector::default();
    let ctx = OwnerContext::default();
    let request = DetectionRequest::default();

    let first = detector
        .detect(&store, &ctx, &service_id, "latency", request)
        .await
        .unwrap();
    let second = detector
        .detect(&store, &ctx, &service_id, "latency", request)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_metric_is_not_found() {
    let (store, service_id) = seeded(&[(1.0, 0)]).await;
    let err = AnomalyDetector::default()
        .detect(
            &store,
            &OwnerContext::default(),
            &service_id,
            "missing",
            DetectionRequest::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_window_excludes_old_readings() {
    // 60s window at t=100s: cutoff 40s, so the 0s outlier is outside.
    let (store, service_id) = seeded(&[
        (1_000.0, 0),
        (10.0, 40_000),
        (12.0, 70_000),
        (11.0, 100_000),
    ])
    .await;
    let result = detected(&store, &service_id, request(60, 3.0)).await;
    assert_eq!(result.window_len, 3);
    assert_eq!(result.window_mean, 11.0);
}

#[test]
fn test_detection_telemetry() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        DetectionTelemetry::record_detection("anomaly", 4);
        DetectionTelemetry::record_anomaly("spike");
        DetectionTelemetry::record_no_data();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    let counter = |name: &str, label: (&str, &str)| {
        snapshot.iter().find_map(|(k, _, _, v)| {
            let labelled = k
                .key()
                .labels()
                .any(|l| l.key() == label.0 && l.value() == label.1);
            match v {
                DebugValue::Counter(n) if k.key().name() == name && labelled => Some(*n),
                _ => None,
            }
        })
    };

    assert_eq!(
        counter("neonomaly_detections_total", ("outcome", "anomaly")),
        Some(1)
    );
    assert_eq!(
        counter("neonomaly_detections_total", ("outcome", "no_data")),
        Some(1)
    );
    assert_eq!(
        counter("neonomaly_anomalies_total", ("type", "spike")),
        Some(1)
    );
    assert!(
        snapshot
            .iter()
            .any(|(k, _, _, _)| k.key().name() == "neonomaly_detection_window_size")
    );
}
