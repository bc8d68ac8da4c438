//! Injected time source. Engines never read ambient wall-clock time
//! directly, which keeps delivery classification and audit timestamps
//! deterministic under test.

use std::sync::RwLock;

use chrono::Utc;
use vigia_core::Timestamp;

/// Time source abstraction.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Settable clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: Timestamp) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, by: chrono::Duration) {
        let current = self.now();
        self.set(current + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
