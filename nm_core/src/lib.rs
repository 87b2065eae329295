//! # Neonomaly Core
//!
//! Shared types and traits for the Neonomaly metric store.
//!
//! This crate provides:
//! - Identifier newtypes for services, metrics, readings and owners
//! - The domain records (`Service`, `Metric`, `MetricReading`)
//! - The `ReadingChain` traversal contract and the `MetricStore` trait
//!
//! # Best Practices
//!
//! - Uses Rust Edition 2024
//! - Timestamps are integer milliseconds (`TimestampMs`) end to end, so
//!   window boundaries are compared exactly

pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use traits::{ChainEntry, MetricStore, ReadingChain};
pub use types::{
    Metric, MetricId, MetricReading, MetricSummary, NewMetric, NewService, OwnerContext, OwnerId,
    ReadingHandle, ReadingId, Service, ServiceId, TimestampMs,
};
