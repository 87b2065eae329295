//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! All variables use the `NM_` prefix.

use crate::layer::{ConfigLayer, DetectionLayer, IdentityLayer, ObservabilityLayer, StorageLayer};
use std::env;

/// Environment loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigEnvError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Load the environment layer of the configuration.
///
/// Unset variables leave their field unset; a variable that is set but cannot
/// be parsed is an error.
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_env;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = load_from_env()?.resolve();
///     println!("Owner: {}", config.identity.owner_id);
///     Ok(())
/// }
/// ```
///
/// ## Environment Variables
/// - `NM_WINDOW_SECONDS`: Default detection window (default: 600)
/// - `NM_SIGMA_THRESHOLD`: Default sigma threshold (default: 3.0)
/// - `NM_STORAGE_BACKEND`: Storage backend (default: "memory")
/// - `NM_STORAGE_SHARDS`: Metric index shard count (default: 16)
/// - `NM_OWNER_ID`: Owner identity (default: "1")
/// - `NM_METRICS_ENABLED`: Enable metrics (true/false/1/0, default: true)
/// - `NM_LOG_LEVEL`: trace/debug/info/warn/error (default: "info")
/// - `NM_LOG_FORMAT`: pretty/json (default: "pretty")
pub fn load_from_env() -> Result<ConfigLayer, ConfigEnvError> {
    Ok(ConfigLayer {
        detection: DetectionLayer {
            default_window_seconds: parse_env("NM_WINDOW_SECONDS")?,
            default_sigma_threshold: parse_env("NM_SIGMA_THRESHOLD")?,
        },
        storage: StorageLayer {
            backend: env::var("NM_STORAGE_BACKEND").ok(),
            shard_amount: parse_env("NM_STORAGE_SHARDS")?,
        },
        identity: IdentityLayer {
            owner_id: env::var("NM_OWNER_ID").ok(),
        },
        observability: ObservabilityLayer {
            metrics_enabled: parse_bool_env("NM_METRICS_ENABLED")?,
            logging_level: env::var("NM_LOG_LEVEL").ok(),
            log_format: env::var("NM_LOG_FORMAT").ok(),
        },
    })
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigEnvError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigEnvError::InvalidValue {
                key: key.to_string(),
                value: s.clone(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_bool_env(key: &str) -> Result<Option<bool>, ConfigEnvError> {
    match env::var(key) {
        Ok(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(ConfigEnvError::InvalidValue {
                key: key.to_string(),
                value: s,
                reason: "expected true/false/1/0".to_string(),
            }),
        },
        Err(_) => Ok(None),
    }
}
