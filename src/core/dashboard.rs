//! Process-wide portal call metrics.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// Call counters and first/last timestamps for portal invocations.
///
/// One instance per runtime, shared by every portal handle and read
/// concurrently by observers. All mutation is lock-free: plain atomic
/// increments for the counters, a set-once compare-exchange for the first-call
/// timestamp, and last-writer-wins for the last-call timestamp. Counters are
/// never reset.
#[derive(Debug, Default)]
pub struct Dashboard {
    completed: AtomicU64,
    failed: AtomicU64,
    first_call_ms: AtomicI64,
    last_call_ms: AtomicI64,
}

impl Dashboard {
    pub fn record_success(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.touch();
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.touch();
    }

    pub(crate) fn record(&self, success: bool) {
        if success {
            self.record_success();
        } else {
            self.record_failure();
        }
    }

    fn touch(&self) {
        let now = Utc::now().timestamp_millis();
        let _ = self
            .first_call_ms
            .compare_exchange(0, now, Ordering::SeqCst, Ordering::SeqCst);
        self.last_call_ms.store(now, Ordering::SeqCst);
    }

    pub fn completed_calls(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed_calls(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn first_call(&self) -> Option<DateTime<Utc>> {
        timestamp(self.first_call_ms.load(Ordering::SeqCst))
    }

    pub fn last_call(&self) -> Option<DateTime<Utc>> {
        timestamp(self.last_call_ms.load(Ordering::SeqCst))
    }
}

fn timestamp(ms: i64) -> Option<DateTime<Utc>> {
    if ms == 0 {
        None
    } else {
        DateTime::from_timestamp_millis(ms)
    }
}
