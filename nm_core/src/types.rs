use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = anyhow::Error;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| anyhow::anyhow!("Invalid {}: {}", $label, e))
            }
        }
    };
}

uuid_id!(
    /// Opaque identifier of a monitored service.
    ServiceId,
    "service ID"
);
uuid_id!(
    /// Opaque identifier of a metric, unique across all services.
    MetricId,
    "metric ID"
);
uuid_id!(
    /// Opaque identifier of a single reading.
    ReadingId,
    "reading ID"
);

/// Identity that owns services. Names are 1-100 characters.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: String) -> Option<Self> {
        if id.is_empty() || id.chars().count() > 100 {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OwnerId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string()).ok_or_else(|| anyhow::anyhow!("Invalid owner ID"))
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self("1".to_string())
    }
}

/// Caller scope for every store operation.
///
/// Services are only visible to the owner that registered them; anything
/// outside the scope is reported as not found.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
pub struct OwnerContext {
    pub owner_id: OwnerId,
}

impl OwnerContext {
    pub fn new(owner_id: OwnerId) -> Self {
        Self { owner_id }
    }
}

/// Milliseconds since the Unix epoch.
///
/// Integer arithmetic keeps window boundaries exact; conversions to
/// `chrono` happen only at the outward interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TimestampMs(i64);

impl TimestampMs {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// `None` when the value is outside the range `chrono` can represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// Start of a window of `window_seconds` trailing this instant.
    ///
    /// Saturates instead of overflowing; a negative window yields a cutoff
    /// after `self`.
    pub fn window_start(self, window_seconds: i64) -> Self {
        Self(self.0.saturating_sub(window_seconds.saturating_mul(1000)))
    }
}

impl std::fmt::Display for TimestampMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<DateTime<Utc>> for TimestampMs {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

/// Position of a reading inside its metric's chain arena.
///
/// Handles are only meaningful for the chain that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReadingHandle(u32);

impl ReadingHandle {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Metric {
    pub id: MetricId,
    pub name: String,
    pub description: Option<String>,
    pub service_id: ServiceId,
}

/// One immutable sample of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricReading {
    pub id: ReadingId,
    pub value: f64,
    pub timestamp: TimestampMs,
}

/// A metric together with its most recent reading, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricSummary {
    pub metric: Metric,
    pub latest_reading: Option<MetricReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NewMetric {
    pub service_id: ServiceId,
    pub name: String,
    pub description: Option<String>,
}
