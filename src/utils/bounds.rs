//! Bounds validation utilities

use crate::limits::{MAX_TIMESTAMP, MIN_TIMESTAMP};

/// Check if timestamp is within acceptable bounds
pub(crate) fn timestamp_in_bounds(value: i64) -> bool {
    (MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&value)
}

/// Apply clock skew to a timestamp, saturating at the i64 range
pub(crate) fn apply_clock_skew(timestamp: i64, skew_seconds: u64, add: bool) -> i64 {
    let skew = i64::try_from(skew_seconds).unwrap_or(i64::MAX);
    if add {
        timestamp.saturating_add(skew)
    } else {
        timestamp.saturating_sub(skew)
    }
}
