//! # Storage Layer
//!
//! Service and metric registry plus the per-metric reading chains.
//!
//! - `chain`: append-only reading arena with two-way insertion links
//! - `memory`: the in-process `MetricStore` implementation
//! - `telemetry`: counters and histograms emitted on writes

pub mod chain;
pub mod memory;
pub mod telemetry;

pub use chain::MetricChain;
pub use memory::InMemoryMetricStore;
pub use telemetry::StorageTelemetry;
