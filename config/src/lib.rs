//! # Configuration System
//!
//! Centralized configuration management for the Neonomaly metric store.
//!
//! This crate provides:
//! - Configuration structures for every component
//! - Environment variable loading (12-factor app principles)
//! - Configuration file loading (TOML/YAML)
//! - Partial per-source layers
//! - Configuration precedence (CLI > env > file > defaults)
//! - Configuration validation

pub mod config;
pub mod file_loader;
pub mod layer;
pub mod loader;
pub mod precedence;
pub mod validator;

pub use config::{Config, DetectionConfig, IdentityConfig, ObservabilityConfig, StorageConfig};
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml, load_from_yaml};
pub use layer::{ConfigLayer, DetectionLayer, IdentityLayer, ObservabilityLayer, StorageLayer};
pub use loader::{ConfigEnvError, load_from_env};
pub use precedence::merge_configs;
pub use crate::validator::validate;
pub use ::validator::Validate;
