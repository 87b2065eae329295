//! # Neonomaly Errors
//!
//! Error handling for the Neonomaly metric store.
//!
//! - Uses `thiserror` for structured error definitions
//! - One enum per layer (storage, detection, tool surface)
//! - `ErrorKind` is the single classification an outer request layer maps
//!   to its own status codes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification shared by every error enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced resource does not exist or is outside the caller's scope.
    NotFound,
    /// The request collides with an existing resource.
    Conflict,
    /// The metric exists but has no readings to analyse.
    NoData,
    /// Input was rejected before reaching the store.
    InvalidInput,
    /// The storage layer failed; fatal for the current request.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NoData => "no_data",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("{resource} with name '{name}' already exists")]
    Conflict { resource: String, name: String },

    #[error("Storage backend {backend} unavailable: {reason}")]
    Unavailable { backend: String, reason: String },
}

impl StorageError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(resource: &str, name: &str) -> Self {
        Self::Conflict {
            resource: resource.to_string(),
            name: name.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::NotFound { .. } => ErrorKind::NotFound,
            StorageError::Conflict { .. } => ErrorKind::Conflict,
            StorageError::Unavailable { .. } => ErrorKind::Internal,
        }
    }

    /// The core never retries; this only tells the caller whether a retry
    /// could succeed without changing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }
}

/// Anomaly detection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("No data found for metric {metric}")]
    NoData { metric: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DetectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectionError::NoData { .. } => ErrorKind::NoData,
            DetectionError::Storage(e) => e.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            DetectionError::NoData { .. } => false,
            DetectionError::Storage(e) => e.is_retryable(),
        }
    }
}

/// Tool interface errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Invalid input: {field} reason: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Resource not found: {resource}:{id}")]
    NotFound { resource: String, id: String },

    #[error("{resource} with this name already exists: {name}")]
    Conflict { resource: String, name: String },

    #[error("No data found for the specified metric: {metric}")]
    NoData { metric: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl ToolError {
    pub fn invalid_input(field: &str, reason: impl ToString) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ToolError::NotFound { .. } => ErrorKind::NotFound,
            ToolError::Conflict { .. } => ErrorKind::Conflict,
            ToolError::NoData { .. } => ErrorKind::NoData,
            ToolError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::Internal { .. })
    }
}

impl From<StorageError> for ToolError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { resource, id } => ToolError::NotFound { resource, id },
            StorageError::Conflict { resource, name } => ToolError::Conflict { resource, name },
            StorageError::Unavailable { backend, reason } => {
                tracing::error!(backend = %backend, "Storage unavailable: {}", reason);
                ToolError::Internal {
                    reason: format!("{backend}: {reason}"),
                }
            }
        }
    }
}

impl From<DetectionError> for ToolError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::NoData { metric } => ToolError::NoData { metric },
            DetectionError::Storage(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ToolError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        ToolError::InvalidInput {
            field: fields.join(","),
            reason: errors.to_string(),
        }
    }
}
