//! Wall-clock abstraction.
//!
//! Token expiry is computed in whole seconds since the Unix epoch. Production
//! code reads [`SystemClock`]; tests drive a [`ManualClock`] so expiry
//! boundaries can be hit exactly.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current time in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now_secs(&self) -> i64;
}

/// Clock backed by the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock that only moves when told to.
///
/// Cloning shares the underlying instant, so a test can keep one handle and
/// hand another to the code under test.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock frozen at `now_secs`.
    #[must_use]
    pub fn new(now_secs: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now_secs)),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now_secs: i64) {
        self.now.store(now_secs, Ordering::SeqCst);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: i64) {
        let _ = self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
