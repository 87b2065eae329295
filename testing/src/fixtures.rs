use nm_core::{
    Metric, MetricStore, NewMetric, NewService, OwnerContext, Service, TimestampMs,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use storage::InMemoryMetricStore;

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

pub fn unique_owner() -> OwnerContext {
    OwnerContext::new(
        nm_core::OwnerId::new(unique_id("test-owner")).unwrap_or_default(),
    )
}

/// Three flat readings then a jump to 100, one second apart.
pub const SPIKE_IN_WIDE_WINDOW: &[(f64, i64)] =
    &[(10.0, 0), (10.0, 1_000), (10.0, 2_000), (100.0, 3_000)];

/// A store holding one service with one metric.
pub struct SeededStore {
    pub store: Arc<InMemoryMetricStore>,
    pub owner: OwnerContext,
    pub service: Service,
    pub metric: Metric,
}

impl SeededStore {
    /// Register a uniquely named service and a metric called `metric_name`
    /// under a fresh owner.
    pub async fn new(metric_name: &str) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryMetricStore::default());
        let owner = unique_owner();

        let service = store
            .create_service(
                &owner,
                NewService {
                    name: unique_id("service"),
                    description: Some("fixture service".to_string()),
                },
            )
            .await?;
        let metric = store
            .create_metric(
                &owner,
                NewMetric {
                    service_id: service.id,
                    name: metric_name.to_string(),
                    description: None,
                },
            )
            .await?;
        tracing::debug!(service_id = %service.id, metric_id = %metric.id, "Seeded store");

        Ok(Self {
            store,
            owner,
            service,
            metric,
        })
    }

    /// Seed and append `points` as `(value, timestamp_ms)` in order.
    pub async fn with_readings(metric_name: &str, points: &[(f64, i64)]) -> anyhow::Result<Self> {
        let seeded = Self::new(metric_name).await?;
        seeded.append(points).await?;
        Ok(seeded)
    }

    pub async fn append(&self, points: &[(f64, i64)]) -> anyhow::Result<()> {
        for (value, ts) in points {
            self.store
                .append_reading(
                    &self.owner,
                    &self.metric.id,
                    *value,
                    Some(TimestampMs::from_millis(*ts)),
                )
                .await?;
        }
        Ok(())
    }
}
