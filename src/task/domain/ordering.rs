//! Derived ordering for the active and archived task lists.
//!
//! Everything here is pure: it reads already-loaded aggregates and never
//! touches storage, so it is safe to call from any thread.

use super::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// Date used to rank a task on the active board.
///
/// `NoDeadline` orders after every `Due` date, so tasks without an
/// actionable deadline sink to the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum SortDate {
    /// The task has an actionable deadline.
    Due(NaiveDate),
    /// No task-level end date and no incomplete process.
    NoDeadline,
}

impl SortDate {
    /// Returns the deadline, or `None` for [`SortDate::NoDeadline`].
    #[must_use]
    pub const fn deadline(self) -> Option<NaiveDate> {
        match self {
            Self::Due(date) => Some(date),
            Self::NoDeadline => None,
        }
    }

    /// Returns a plain date, mapping [`SortDate::NoDeadline`] to
    /// [`NaiveDate::MAX`].
    #[must_use]
    pub const fn as_date(self) -> NaiveDate {
        match self {
            Self::Due(date) => date,
            Self::NoDeadline => NaiveDate::MAX,
        }
    }

    /// Returns `true` when the deadline lies strictly before `today`.
    #[must_use]
    pub fn is_overdue(self, today: NaiveDate) -> bool {
        self.deadline().is_some_and(|date| date < today)
    }
}

impl fmt::Display for SortDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Due(date) => write!(f, "{date}"),
            Self::NoDeadline => f.write_str("no deadline"),
        }
    }
}

/// Derives the ranking date for a task.
///
/// The task-level end date wins. Otherwise the earliest end date among
/// incomplete processes is used, and [`SortDate::NoDeadline`] when none
/// remain.
#[must_use]
pub fn compute_sort_date(task: &Task) -> SortDate {
    if let Some(end_date) = task.end_date() {
        return SortDate::Due(end_date);
    }

    task.processes()
        .iter()
        .filter(|process| !process.is_completed())
        .map(super::Process::end_date)
        .min()
        .map_or(SortDate::NoDeadline, SortDate::Due)
}

/// Ranks the active board.
///
/// Completed tasks are dropped before sorting. The sort is stable, so tasks
/// sharing a sort date keep their input order.
#[must_use]
pub fn rank_active(tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
    let mut active: Vec<Task> = tasks
        .into_iter()
        .filter(|task| !task.is_completed())
        .collect();
    active.sort_by_key(Task::sort_date);
    active
}

/// Orders the archive with the most recently completed task first.
///
/// Active tasks are dropped. The sort is stable.
#[must_use]
pub fn archived(tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
    let mut completed: Vec<Task> = tasks
        .into_iter()
        .filter(Task::is_completed)
        .collect();
    completed.sort_by_key(|task| Reverse(task.completed_at()));
    completed
}
