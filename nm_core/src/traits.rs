//! Core traits for the metric store

use crate::types::{
    Metric, MetricId, MetricReading, MetricSummary, NewMetric, NewService, OwnerContext,
    ReadingHandle, Service, ServiceId, TimestampMs,
};
use async_trait::async_trait;
use errors::StorageError;
use std::sync::Arc;

/// A reading together with its position in the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainEntry {
    pub handle: ReadingHandle,
    pub reading: MetricReading,
}

/// Read access to one metric's reading chain.
///
/// The chain is ordered by insertion: `predecessor` steps to the reading
/// appended just before, `successor` to the one appended just after. Both
/// hops are O(1). Implementations must never block on the append path.
pub trait ReadingChain: Send + Sync {
    /// The most recently appended reading, or `None` for an empty chain.
    fn latest(&self) -> Option<ChainEntry>;

    fn predecessor(&self, entry: &ChainEntry) -> Option<ChainEntry>;

    fn successor(&self, entry: &ChainEntry) -> Option<ChainEntry>;
}

/// Storage backend for services, metrics and their reading chains.
///
/// Every operation is scoped by an `OwnerContext`; resources belonging to a
/// different owner are reported as `StorageError::NotFound`.
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn create_service(
        &self,
        ctx: &OwnerContext,
        service: NewService,
    ) -> Result<Service, StorageError>;

    /// Services of the caller, newest first.
    async fn list_services(&self, ctx: &OwnerContext) -> Result<Vec<Service>, StorageError>;

    async fn get_service(
        &self,
        ctx: &OwnerContext,
        service_id: &ServiceId,
    ) -> Result<Service, StorageError>;

    async fn create_metric(
        &self,
        ctx: &OwnerContext,
        metric: NewMetric,
    ) -> Result<Metric, StorageError>;

    /// Metrics of a service in registration order, each with its latest reading.
    async fn list_metrics(
        &self,
        ctx: &OwnerContext,
        service_id: &ServiceId,
    ) -> Result<Vec<MetricSummary>, StorageError>;

    async fn find_metric(
        &self,
        ctx: &OwnerContext,
        service_id: &ServiceId,
        name: &str,
    ) -> Result<Metric, StorageError>;

    /// Append a reading, relinking the metric's latest pointer atomically.
    ///
    /// `timestamp` defaults to the current wall-clock time.
    async fn append_reading(
        &self,
        ctx: &OwnerContext,
        metric_id: &MetricId,
        value: f64,
        timestamp: Option<TimestampMs>,
    ) -> Result<MetricReading, StorageError>;

    async fn latest_reading(
        &self,
        ctx: &OwnerContext,
        metric_id: &MetricId,
    ) -> Result<Option<MetricReading>, StorageError>;

    /// Read handle on a metric's chain for window reconstruction.
    async fn chain(
        &self,
        ctx: &OwnerContext,
        metric_id: &MetricId,
    ) -> Result<Arc<dyn ReadingChain>, StorageError>;
}
