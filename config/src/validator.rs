//! # Configuration Validation
//!
//! Provides validation for all configuration structures using the `validator` crate.

use crate::config::Config;
use validator::Validate;

/// Validate configuration structure.
///
/// ## Usage
/// ```rust,no_run
/// use config::{Config, validate};
///
/// let config = Config::default();
/// match validate(&config) {
///     Ok(()) => println!("Configuration is valid"),
///     Err(errors) => println!("Validation errors: {:?}", errors),
/// }
/// ```
///
/// ## Validation Rules
/// ### Storage
/// - `backend`: must be "memory"
/// - `shard_amount`: 2-1024
///
/// ### Identity
/// - `owner_id`: 1-100 characters
///
/// ### Observability
/// - `logging_level`: must be "trace", "debug", "info", "warn", or "error"
/// - `log_format`: must be "pretty" or "json"
///
/// Detection defaults carry no bounds.
pub fn validate(config: &Config) -> Result<(), validator::ValidationErrors> {
    config.validate()
}
