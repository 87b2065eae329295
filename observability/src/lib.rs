//! # Observability Module
//!
//! Windowed statistics and anomaly detection over metric reading chains:
//! - Window reconstruction from the latest reading backwards
//! - Population mean and standard deviation
//! - Sigma-threshold classification

pub mod anomaly_detection;
pub mod stats;
pub mod telemetry;
pub mod window;

pub use anomaly_detection::{
    AnomalyDetector, AnomalySeverity, AnomalyType, DetectionRequest, DetectionResult,
    DetectorConfig, classify,
};
pub use stats::WindowStats;
pub use telemetry::DetectionTelemetry;
pub use window::reconstruct;
