//! Hand-driven clock for expiry tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use nexza_domain::clock::Clock;

/// Clock that only moves when told to. Clones share the same instant, so a
/// test can keep one handle and pass another into a use case.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Clock starting at a fixed, arbitrary instant (2026-10-19T09:00:00Z).
    pub fn epoch() -> Self {
        Self::at(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
