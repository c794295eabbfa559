//! Request timestamps for signed Poloniex calls.
//!
//! Every signed request carries a `signTimestamp` header in milliseconds since
//! the UNIX epoch. Poloniex rejects requests whose timestamp drifts too far
//! from server time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of `signTimestamp` values.
pub trait TimestampProvider: Send + Sync {
    /// Milliseconds since the UNIX epoch for the next request.
    fn timestamp_millis(&self) -> u64;
}

/// Wall-clock timestamps that never repeat.
///
/// Two requests signed within the same millisecond get consecutive values,
/// so identical requests still produce distinct signatures.
#[derive(Debug, Default)]
pub struct SystemTimestamp {
    last: AtomicU64,
}

impl SystemTimestamp {
    /// Create a new provider.
    pub fn new() -> Self {
        Self::default()
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl TimestampProvider for SystemTimestamp {
    fn timestamp_millis(&self) -> u64 {
        let now = Self::now_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_default();
        now.max(previous + 1)
    }
}

/// Always returns the same timestamp. Useful for reproducible signatures.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestamp(pub u64);

impl TimestampProvider for FixedTimestamp {
    fn timestamp_millis(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_timestamps_strictly_increase() {
        let provider = SystemTimestamp::new();
        let mut last = 0;
        for _ in 0..1000 {
            let ts = provider.timestamp_millis();
            assert!(ts > last);
            last = ts;
        }
    }

    #[test]
    fn test_timestamps_close_to_wall_clock() {
        let provider = SystemTimestamp::new();
        let ts = provider.timestamp_millis();
        let now = SystemTimestamp::now_millis();
        assert!(now + 1000 > ts && ts + 1000 > now);
    }

    #[test]
    fn test_timestamps_unique_across_threads() {
        let provider = Arc::new(SystemTimestamp::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let provider = Arc::clone(&provider);
                thread::spawn(move || {
                    (0..500)
                        .map(|_| provider.timestamp_millis())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for ts in handle.join().unwrap() {
                assert!(seen.insert(ts), "duplicate timestamp {ts}");
            }
        }
    }

    #[test]
    fn test_fixed_timestamp() {
        let provider = FixedTimestamp(1_700_000_000_000);
        assert_eq!(provider.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(provider.timestamp_millis(), 1_700_000_000_000);
    }
}
