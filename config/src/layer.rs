//! # Configuration Layers
//!
//! A layer is one source's view of the configuration: only the fields that
//! source actually set are `Some`. Files and the environment produce layers,
//! and [`merge_configs`](crate::merge_configs) folds them over the defaults,
//! so a source that sets a field to its default value still wins over a
//! lower-priority source.

use crate::config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub detection: DetectionLayer,

    #[serde(default)]
    pub storage: StorageLayer,

    #[serde(default)]
    pub identity: IdentityLayer,

    #[serde(default)]
    pub observability: ObservabilityLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectionLayer {
    pub default_window_seconds: Option<i64>,
    pub default_sigma_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StorageLayer {
    pub backend: Option<String>,
    pub shard_amount: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IdentityLayer {
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObservabilityLayer {
    pub metrics_enabled: Option<bool>,
    pub logging_level: Option<String>,
    pub log_format: Option<String>,
}

impl ConfigLayer {
    /// Apply this layer alone on top of the defaults.
    ///
    /// ## Usage
    /// ```rust,no_run
    /// use config::load_from_file;
    /// use std::path::Path;
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = load_from_file(Path::new("neonomaly.toml"))?.resolve();
    ///     println!("Owner: {}", config.identity.owner_id);
    ///     Ok(())
    /// }
    /// ```
    pub fn resolve(self) -> Config {
        crate::merge_configs(Config::default(), self, Self::default(), None)
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
