use std::collections::HashMap;

use parking_lot::RwLock;

/// Hourly action counter, bucketed by an integer hour index rather than
/// a calendar date — the caller supplies `now_hour_bucket` (e.g.
/// `now_ns / 3_600_000_000_000`), so this tracker carries no clock of
/// its own.
#[derive(Default)]
pub struct RateTracker {
    buckets: RwLock<HashMap<String, (i64, u32)>>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one action for `key` and report whether it exceeds
    /// `max_per_hour` for the current bucket. A new bucket resets the
    /// count to zero before recording.
    pub fn record_and_check(&self, key: &str, max_per_hour: u32, now_hour_bucket: i64) -> bool {
        let mut buckets = self.buckets.write();
        let entry = buckets.entry(key.to_string()).or_insert((now_hour_bucket, 0));
        if entry.0 != now_hour_bucket {
            *entry = (now_hour_bucket, 0);
        }
        entry.1 += 1;
        entry.1 > max_per_hour
    }

    pub fn count_for(&self, key: &str, now_hour_bucket: i64) -> u32 {
        self.buckets
            .read()
            .get(key)
            .filter(|(bucket, _)| *bucket == now_hour_bucket)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}
