//! Trailing time window over a reading chain.

use nm_core::{MetricReading, ReadingChain};

/// Readings inside the trailing window of `window_seconds` ending at the
/// latest reading, newest first.
///
/// The walk follows insertion order backwards and stops at the first
/// reading older than the cutoff, so a backfilled reading with an earlier
/// timestamp ends the window even if older insertions would still qualify.
/// The latest reading is always included, whatever the window. An empty
/// result means the chain itself is empty.
pub fn reconstruct(chain: &dyn ReadingChain, window_seconds: i64) -> Vec<MetricReading> {
    let Some(latest) = chain.latest() else {
        return Vec::new();
    };
    let cutoff = latest.reading.timestamp.window_start(window_seconds);

    let mut readings = vec![latest.reading];
    let mut cursor = chain.predecessor(&latest);
    while let Some(entry) = cursor {
        if entry.reading.timestamp < cutoff {
            break;
        }
        readings.push(entry.reading);
        cursor = chain.predecessor(&entry);
    }
    readings
}

#[cfg(test)]
mod tests {
    use super::*;
    use nm_core::{MetricId, TimestampMs};
    use storage::MetricChain;

    fn chain_of(points: &[(f64, i64)]) -> MetricChain {
        let chain = MetricChain::new(MetricId::generate());
        for (value, ts) in points {
            chain.append(*value, TimestampMs::from_millis(*ts)).unwrap();
        }
        chain
    }

    fn timestamps(readings: &[MetricReading]) -> Vec<i64> {
        readings.iter().map(|r| r.timestamp.as_millis()).collect()
    }

    #[test]
    fn test_empty_chain_gives_empty_window() {
        let chain = chain_of(&[]);
        assert!(reconstruct(&chain, 600).is_empty());
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let chain = chain_of(&[(1.0, 0), (2.0, 1_000), (3.0, 2_000), (4.0, 3_000)]);
        assert_eq!(
            timestamps(&reconstruct(&chain, 2)),
            vec![3_000, 2_000, 1_000]
        );
    }

    #[test]
    fn test_zero_window_keeps_only_latest() {
        let chain = chain_of(&[(1.0, 0), (2.0, 1_000)]);
        let window = reconstruct(&chain, 0);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].value, 2.0);
    }

    #[test]
    fn test_negative_window_still_includes_latest() {
        let chain = chain_of(&[(1.0, 5_000), (2.0, 5_000)]);
        let window = reconstruct(&chain, -10);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].value, 2.0);
    }

    #[test]
    fn test_backfill_stops_walk_at_first_old_reading() {
        // Inserted in this order; the backfilled t=0 reading ends the walk
        // even though t=9_000 was inserted before it.
        let chain = chain_of(&[(1.0, 9_000), (2.0, 0), (3.0, 10_000)]);
        assert_eq!(timestamps(&reconstruct(&chain, 5)), vec![10_000]);
    }

    #[test]
    fn test_extreme_window_does_not_overflow() {
        let chain = chain_of(&[(1.0, i64::MIN + 1), (2.0, 0)]);
        assert_eq!(reconstruct(&chain, i64::MAX).len(), 2);
    }
}
