//! Clock abstraction for the registry core.
//!
//! Expiry comparisons run against an injected clock rather than ambient
//! system time, so tests and replay tooling control "now" and callers
//! cannot introduce clock-skew bugs by comparing timestamps themselves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use careledger_types::Timestamp;

/// Monotonic time source injected into the registry core.
pub trait Clock: Send + Sync {
    /// Current time in microseconds since `UNIX_EPOCH`. Successive calls
    /// never go backwards.
    fn now_us(&self) -> Timestamp;
}

/// Wall clock with enforced monotonicity.
///
/// The raw system clock can step backwards (NTP correction, VM
/// migration); expiry comparisons require that it never does. Each
/// emitted value is clamped to strictly exceed the previous one.
pub struct SystemClock {
    last_us: Mutex<u64>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last_us: Mutex::new(0),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_us(&self) -> Timestamp {
        let mut last = self.last_us.lock();
        let now = system_time_us();
        let next = if now <= *last {
            last.saturating_add(1)
        } else {
            now
        };
        *last = next;
        next
    }
}

fn system_time_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}

/// Manually driven clock for tests.
pub struct ManualClock {
    now_us: AtomicU64,
}

impl ManualClock {
    pub fn new(start_us: Timestamp) -> Self {
        Self {
            now_us: AtomicU64::new(start_us),
        }
    }

    pub fn set(&self, now_us: Timestamp) {
        self.now_us.store(now_us, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_us: u64) {
        self.now_us.fetch_add(delta_us, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> Timestamp {
        self.now_us.load(Ordering::SeqCst)
    }
}
