//! In-memory implementation of `MetricStore`.
//!
//! Services and their metric name index sit behind one registry lock, which
//! is only taken for registration and listing. Metrics are looked up through
//! a sharded `DashMap`, and each metric owns its own `MetricChain`, so
//! appends to different metrics never contend on a shared lock.

use crate::chain::MetricChain;
use crate::telemetry::StorageTelemetry;
use async_trait::async_trait;
use config::StorageConfig;
use dashmap::DashMap;
use errors::StorageError;
use nm_core::{
    Metric, MetricId, MetricReading, MetricStore, MetricSummary, NewMetric, NewService,
    OwnerContext, OwnerId, ReadingChain, Service, ServiceId, TimestampMs,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};

const BACKEND: &str = "memory";

struct ServiceEntry {
    service: Service,
    metric_order: Vec<MetricId>,
    metrics_by_name: HashMap<String, MetricId>,
}

#[derive(Default)]
struct ServiceRegistry {
    by_id: HashMap<ServiceId, ServiceEntry>,
    order: Vec<ServiceId>,
    names: HashSet<(OwnerId, String)>,
}

impl ServiceRegistry {
    fn visible(&self, ctx: &OwnerContext, service_id: &ServiceId) -> Option<&ServiceEntry> {
        self.by_id
            .get(service_id)
            .filter(|entry| entry.service.owner_id == ctx.owner_id)
    }
}

struct MetricEntry {
    metric: Metric,
    owner_id: OwnerId,
    chain: Arc<MetricChain>,
}

pub struct InMemoryMetricStore {
    registry: RwLock<ServiceRegistry>,
    metrics: DashMap<MetricId, Arc<MetricEntry>>,
    closed: AtomicBool,
}

impl Default for InMemoryMetricStore {
    fn default() -> Self {
        Self::new(StorageConfig::default())
    }
}

impl InMemoryMetricStore {
    pub fn new(config: StorageConfig) -> Self {
        let shard_amount = config.shard_amount.max(2).next_power_of_two();
        info!(backend = %config.backend, shard_amount, "Initializing metric store");
        Self {
            registry: RwLock::new(ServiceRegistry::default()),
            metrics: DashMap::with_shard_amount(shard_amount),
            closed: AtomicBool::new(false),
        }
    }

    /// Take the store offline. Every later operation fails with
    /// `StorageError::Unavailable`.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Metric store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of readings stored for a metric, regardless of owner.
    pub fn chain_len(&self, metric_id: &MetricId) -> Option<usize> {
        self.metrics.get(metric_id).map(|entry| entry.chain.len())
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.is_closed() {
            return Err(StorageError::Unavailable {
                backend: BACKEND.to_string(),
                reason: "store is closed".to_string(),
            });
        }
        Ok(())
    }

    fn visible_metric(
        &self,
        ctx: &OwnerContext,
        metric_id: &MetricId,
    ) -> Result<Arc<MetricEntry>, StorageError> {
        let entry = self
            .metrics
            .get(metric_id)
            .map(|entry| Arc::clone(entry.value()))
            .filter(|entry| entry.owner_id == ctx.owner_id);
        entry.ok_or_else(|| StorageError::not_found("Metric", metric_id))
    }

    fn rejected<T>(operation: &str, err: StorageError) -> Result<T, StorageError> {
        StorageTelemetry::record_rejection(operation, err.kind().as_str());
        Err(err)
    }
}

#[async_trait]
impl MetricStore for InMemoryMetricStore {
    #[instrument(skip(self, ctx, service), fields(owner = %ctx.owner_id, name = %service.name))]
    async fn create_service(
        &self,
        ctx: &OwnerContext,
        service: NewService,
    ) -> Result<Service, StorageError> {
        self.ensure_open()?;
        let mut registry = self.registry.write();

        let key = (ctx.owner_id.clone(), service.name.clone());
        if registry.names.contains(&key) {
            return Self::rejected(
                "create_service",
                StorageError::conflict("Service", &service.name),
            );
        }

        let created = Service {
            id: ServiceId::generate(),
            name: service.name,
            description: service.description,
            owner_id: ctx.owner_id.clone(),
            created_at: chrono::Utc::now(),
        };
        registry.names.insert(key);
        registry.order.push(created.id);
        registry.by_id.insert(
            created.id,
            ServiceEntry {
                service: created.clone(),
                metric_order: Vec::new(),
                metrics_by_name: HashMap::new(),
            },
        );

        StorageTelemetry::record_service_created();
        info!(service_id = %created.id, "Service registered");
        Ok(created)
    }

    async fn list_services(&self, ctx: &OwnerContext) -> Result<Vec<Service>, StorageError> {
        self.ensure_open()?;
        let registry = self.registry.read();

        let mut services: Vec<Service> = registry
            .order
            .iter()
            .rev()
            .filter_map(|id| registry.visible(ctx, id))
            .map(|entry| entry.service.clone())
            .collect();
        // Stable: equal timestamps keep newest-registered first.
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(services)
    }

    async fn get_service(
        &self,
        ctx: &OwnerContext,
        service_id: &ServiceId,
    ) -> Result<Service, StorageError> {
        self.ensure_open()?;
        self.registry
            .read()
            .visible(ctx, service_id)
            .map(|entry| entry.service.clone())
            .ok_or_else(|| StorageError::not_found("Service", service_id))
    }

    #[instrument(skip(self, ctx, metric), fields(service_id = %metric.service_id, name = %metric.name))]
    async fn create_metric(
        &self,
        ctx: &OwnerContext,
        metric: NewMetric,
    ) -> Result<Metric, StorageError> {
        self.ensure_open()?;
        let mut registry = self.registry.write();

        let Some(entry) = registry
            .by_id
            .get_mut(&metric.service_id)
            .filter(|entry| entry.service.owner_id == ctx.owner_id)
        else {
            return Self::rejected(
                "create_metric",
                StorageError::not_found("Service", metric.service_id),
            );
        };

        if entry.metrics_by_name.contains_key(&metric.name) {
            return Self::rejected(
                "create_metric",
                StorageError::conflict("Metric", &metric.name),
            );
        }

        let created = Metric {
            id: MetricId::generate(),
            name: metric.name,
            description: metric.description,
            service_id: metric.service_id,
        };
        entry
            .metrics_by_name
            .insert(created.name.clone(), created.id);
        entry.metric_order.push(created.id);
        self.metrics.insert(
            created.id,
            Arc::new(MetricEntry {
                metric: created.clone(),
                owner_id: ctx.owner_id.clone(),
                chain: Arc::new(MetricChain::new(created.id)),
            }),
        );

        StorageTelemetry::record_metric_created();
        info!(metric_id = %created.id, "Metric registered");
        Ok(created)
    }

    async fn list_metrics(
        &self,
        ctx: &OwnerContext,
        service_id: &ServiceId,
    ) -> Result<Vec<MetricSummary>, StorageError> {
        self.ensure_open()?;
        let registry = self.registry.read();
        let entry = registry
            .visible(ctx, service_id)
            .ok_or_else(|| StorageError::not_found("Service", service_id))?;

        Ok(entry
            .metric_order
            .iter()
            .filter_map(|id| self.metrics.get(id).map(|m| Arc::clone(m.value())))
            .map(|m| MetricSummary {
                metric: m.metric.clone(),
                latest_reading: m.chain.latest().map(|e| e.reading),
            })
            .collect())
    }

    async fn find_metric(
        &self,
        ctx: &OwnerContext,
        service_id: &ServiceId,
        name: &str,
    ) -> Result<Metric, StorageError> {
        self.ensure_open()?;
        let metric_id = {
            let registry = self.registry.read();
            let entry = registry
                .visible(ctx, service_id)
                .ok_or_else(|| StorageError::not_found("Service", service_id))?;
            *entry
                .metrics_by_name
                .get(name)
                .ok_or_else(|| StorageError::not_found("Metric", name))?
        };
        Ok(self.visible_metric(ctx, &metric_id)?.metric.clone())
    }

    #[instrument(skip(self, ctx), fields(owner = %ctx.owner_id))]
    async fn append_reading(
        &self,
        ctx: &OwnerContext,
        metric_id: &MetricId,
        value: f64,
        timestamp: Option<TimestampMs>,
    ) -> Result<MetricReading, StorageError> {
        self.ensure_open()?;
        let entry = match self.visible_metric(ctx, metric_id) {
            Ok(entry) => entry,
            Err(err) => return Self::rejected("append_reading", err),
        };

        if !value.is_finite() {
            warn!(%metric_id, value, "Appending non-finite reading");
        }

        let timestamp = timestamp.unwrap_or_else(utils::now_millis);
        let appended = entry.chain.append(value, timestamp)?;
        StorageTelemetry::record_reading_appended(appended.handle.index() + 1);
        Ok(appended.reading)
    }

    async fn latest_reading(
        &self,
        ctx: &OwnerContext,
        metric_id: &MetricId,
    ) -> Result<Option<MetricReading>, StorageError> {
        self.ensure_open()?;
        let entry = self.visible_metric(ctx, metric_id)?;
        Ok(entry.chain.latest().map(|e| e.reading))
    }

    async fn chain(
        &self,
        ctx: &OwnerContext,
        metric_id: &MetricId,
    ) -> Result<Arc<dyn ReadingChain>, StorageError> {
        self.ensure_open()?;
        let entry = self.visible_metric(ctx, metric_id)?;
        Ok(Arc::clone(&entry.chain) as Arc<dyn ReadingChain>)
    }
}
