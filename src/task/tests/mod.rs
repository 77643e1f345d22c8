//! Unit tests for the task context.


use crate::task::domain::{Process, Task, TaskTitle};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Clock that advances by one second on every reading.
#[derive(Debug)]
pub(super) struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub(super) fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::starting_at(
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
                .single()
                .expect("valid start instant"),
        )
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock should not be poisoned");
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub(super) fn title(value: &str) -> TaskTitle {
    TaskTitle::new(value).expect("valid title")
}

pub(super) fn process(name: &str, end: NaiveDate) -> Process {
    Process::new(name, None, end).expect("valid process")
}

pub(super) fn task_titled(value: &str, clock: &impl Clock) -> Task {
    Task::new(title(value), clock)
}
