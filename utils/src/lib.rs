//! # Neonomaly Utilities
//!
//! Common utility functions for wall-clock time, display rounding and
//! name validation.

use nm_core::TimestampMs;

/// Longest accepted service or metric name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Current wall-clock time in milliseconds since the epoch.
#[must_use]
pub fn now_millis() -> TimestampMs {
    TimestampMs::from_datetime(chrono::Utc::now())
}

/// Round to `places` decimal places, halves away from zero.
///
/// # Examples
///
/// ```
/// use utils::round_to;
///
/// assert_eq!(round_to(38.971_143, 2), 38.97);
/// assert_eq!(round_to(-2.345, 1), -2.3);
/// ```
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Two-decimal rounding used for displayed window statistics.
#[must_use]
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Validate a service or metric name: 1 to 100 characters.
pub fn validate_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if len == 0 {
        return Err("name must not be empty".to_string());
    }
    if len > MAX_NAME_LENGTH {
        return Err(format!("name is {len} characters, max {MAX_NAME_LENGTH}"));
    }
    Ok(())
}
