use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::TimestampMs;

/// Millisecond time source shared by the recorder pipeline.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> TimestampMs;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        chrono::Utc::now().timestamp_millis().max(0) as TimestampMs
    }
}

/// Clock that only moves when told to. Cloned handles share the same instant.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: TimestampMs) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: TimestampMs) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) -> TimestampMs {
        self.now.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> TimestampMs {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_handles_share_time() {
        let clock = ManualClock::new(1_000);
        let other = clock.clone();
        assert_eq!(clock.advance(250), 1_250);
        assert_eq!(other.now_ms(), 1_250);
        other.set(5_000);
        assert_eq!(clock.now_ms(), 5_000);
    }
}
