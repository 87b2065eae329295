//! # Configuration Precedence
//!
//! Merges configuration from multiple sources with precedence rules.
//!
//! # Precedence Order
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)

use crate::config::{Config, DetectionConfig, IdentityConfig, ObservabilityConfig, StorageConfig};
use crate::layer::{ConfigLayer, DetectionLayer, IdentityLayer, ObservabilityLayer, StorageLayer};

/// Merge multiple configuration sources with precedence.
///
/// Every field a layer sets overrides the lower-priority value, even when it
/// equals the default. Fields a layer leaves unset are untouched.
///
/// ## Usage
/// ```rust,no_run
/// use config::{Config, merge_configs, load_from_file, load_from_env};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let from_file = load_from_file(Path::new("neonomaly.toml"))?;
///     let from_env = load_from_env()?;
///
///     let _config = merge_configs(Config::default(), from_file, from_env, None);
///     Ok(())
/// }
/// ```
pub fn merge_configs(
    defaults: Config,
    file_layer: ConfigLayer,
    env_layer: ConfigLayer,
    cli_layer: Option<ConfigLayer>,
) -> Config {
    let mut config = defaults;

    config = merge_with_logging(config, file_layer, "file");
    config = merge_with_logging(config, env_layer, "env");

    if let Some(cli) = cli_layer {
        config = merge_with_logging(config, cli, "cli");
    }

    config
}

macro_rules! merge_field {
    ($base:expr, $over:expr, $section:literal, $field:ident, $changes:expr) => {
        if let Some(value) = &$over.$field {
            if *value != $base.$field {
                let change = format!("{}.{} = {:?}", $section, stringify!($field), value);
                $changes.push(change);
            }
            $base.$field = value.clone();
        }
    };
}

fn merge_with_logging(mut base: Config, layer: ConfigLayer, source_name: &str) -> Config {
    let mut changes = Vec::new();

    merge_detection(&mut base.detection, &layer.detection, &mut changes);
    merge_storage(&mut base.storage, &layer.storage, &mut changes);
    merge_identity(&mut base.identity, &layer.identity, &mut changes);
    merge_observability(
        &mut base.observability,
        &layer.observability,
        &mut changes,
    );

    if !changes.is_empty() {
        tracing::debug!("Configuration from {}: {:?}", source_name, changes);
    }

    base
}

fn merge_detection(base: &mut DetectionConfig, layer: &DetectionLayer, changes: &mut Vec<String>) {
    merge_field!(base, layer, "detection", default_window_seconds, changes);
    merge_field!(base, layer, "detection", default_sigma_threshold, changes);
}

fn merge_storage(base: &mut StorageConfig, layer: &StorageLayer, changes: &mut Vec<String>) {
    merge_field!(base, layer, "storage", backend, changes);
    merge_field!(base, layer, "storage", shard_amount, changes);
}

fn merge_identity(base: &mut IdentityConfig, layer: &IdentityLayer, changes: &mut Vec<String>) {
    merge_field!(base, layer, "identity", owner_id, changes);
}

fn merge_observability(
    base: &mut ObservabilityConfig,
    layer: &ObservabilityLayer,
    changes: &mut Vec<String>,
) {
    merge_field!(base, layer, "observability", metrics_enabled, changes);
    merge_field!(base, layer, "observability", logging_level, changes);
    merge_field!(base, layer, "observability", log_format, changes);
}
