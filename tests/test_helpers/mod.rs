//! Helpers shared by the integration test crates.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Clock that moves forward one minute on every reading.
///
/// Readings are whole seconds, so timestamps survive a round trip through
/// `PostgreSQL` unchanged.
#[derive(Debug)]
pub struct TickingClock {
    next: Mutex<DateTime<Utc>>,
}

impl Default for TickingClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
            .single()
            .expect("valid start instant");
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Clock for TickingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock should not be poisoned");
        let now = *next;
        *next = now + Duration::minutes(1);
        now
    }
}

/// Builds a calendar date.
///
/// # Panics
///
/// Panics when the components do not form a valid date.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}
