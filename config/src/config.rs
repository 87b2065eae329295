//! # Configuration Structures
//!
//! This module defines all configuration structures for the Neonomaly
//! metric store.
//!
//! All configuration structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for input validation
//! - Fall back to defaults for every omitted field

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main configuration structure for the Neonomaly metric store.
///
/// ## Usage
/// ```rust,no_run
/// use config::Config;
///
/// let config = Config::default();
/// println!("Default window: {}s", config.detection.default_window_seconds);
/// ```
///
/// ## Fields
/// - `detection`: Defaults applied when a detection request omits them
/// - `storage`: Storage backend selection and sizing
/// - `identity`: The single owner identity requests are scoped to
/// - `observability`: Metrics and logging
///
/// ## Validation
/// All nested configurations must pass their own validation rules.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    /// Anomaly detection defaults
    #[serde(default)]
    #[validate(nested)]
    pub detection: DetectionConfig,

    /// Storage backend configuration
    #[serde(default)]
    #[validate(nested)]
    pub storage: StorageConfig,

    /// Caller identity configuration
    #[serde(default)]
    #[validate(nested)]
    pub identity: IdentityConfig,

    /// Observability configuration (metrics, logging)
    #[serde(default)]
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

/// Anomaly detection defaults.
///
/// Callers may override both values per request with any number, including
/// zero or negative values; no bounds are enforced here either.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DetectionConfig {
    /// Trailing window in seconds
    #[serde(default = "default_window_seconds")]
    pub default_window_seconds: i64,

    /// Multiplier applied to the window standard deviation
    #[serde(default = "default_sigma_threshold")]
    pub default_sigma_threshold: f64,
}

fn default_window_seconds() -> i64 {
    600
}

fn default_sigma_threshold() -> f64 {
    3.0
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            default_window_seconds: default_window_seconds(),
            default_sigma_threshold: default_sigma_threshold(),
        }
    }
}

/// Storage backend configuration.
///
/// ## Fields
/// - `backend`: Storage backend, only `"memory"` is available
/// - `shard_amount`: Shard count of the metric index, rounded up to a power
///   of two by the store
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    #[validate(custom(function = "validate_storage_backend"))]
    pub backend: String,

    #[serde(default = "default_shard_amount")]
    #[validate(range(min = 2, max = 1024))]
    pub shard_amount: usize,
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_shard_amount() -> usize {
    16
}

fn validate_storage_backend(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "memory" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid storage backend")),
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            shard_amount: default_shard_amount(),
        }
    }
}

/// Caller identity configuration.
///
/// There is no authentication layer; every request runs as this owner.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct IdentityConfig {
    #[serde(default = "default_owner_id")]
    #[validate(length(min = 1, max = 100))]
    pub owner_id: String,
}

fn default_owner_id() -> String {
    "1".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            owner_id: default_owner_id(),
        }
    }
}

/// Observability configuration.
///
/// ## Fields
/// - `metrics_enabled`: Install a metrics recorder in the binary
/// - `logging_level`: trace/debug/info/warn/error
/// - `log_format`: `pretty` or `json`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ObservabilityConfig {
    #[serde(default = "default_observability_metrics_enabled")]
    pub metrics_enabled: bool,

    #[serde(default = "default_observability_logging_level")]
    #[validate(custom(function = "validate_logging_level"))]
    pub logging_level: String,

    #[serde(default = "default_observability_log_format")]
    #[validate(custom(function = "validate_log_format"))]
    pub log_format: String,
}

fn default_observability_metrics_enabled() -> bool {
    true
}

fn default_observability_logging_level() -> String {
    "info".to_string()
}

fn default_observability_log_format() -> String {
    "pretty".to_string()
}

fn validate_logging_level(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid logging level")),
    }
}

fn validate_log_format(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "pretty" | "json" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid log format")),
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: default_observability_metrics_enabled(),
            logging_level: default_observability_logging_level(),
            log_format: default_observability_log_format(),
        }
    }
}
