//! Work processes owned by a task.

use super::{ProcessId, TaskDomainError, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One step of work within a task, with its own date range and completion
/// flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    id: ProcessId,
    owner: Option<TaskId>,
    name: String,
    start_date: Option<NaiveDate>,
    end_date: NaiveDate,
    completed: bool,
}

/// Parameter object for reconstructing a persisted process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProcessData {
    /// Persisted process identifier.
    pub id: ProcessId,
    /// Owning task identifier.
    pub task_id: TaskId,
    /// Process name.
    pub name: String,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Required end date.
    pub end_date: NaiveDate,
    /// Completion flag.
    pub completed: bool,
}

impl Process {
    /// Creates a detached, incomplete process.
    ///
    /// The process gains its owner when added to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProcessName`] when the name is empty
    /// after trimming.
    pub fn new(
        name: impl Into<String>,
        start_date: Option<NaiveDate>,
        end_date: NaiveDate,
    ) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyProcessName);
        }

        Ok(Self {
            id: ProcessId::new(),
            owner: None,
            name: trimmed.to_owned(),
            start_date,
            end_date,
            completed: false,
        })
    }

    /// Reconstructs a process from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProcessData) -> Self {
        Self {
            id: data.id,
            owner: Some(data.task_id),
            name: data.name,
            start_date: data.start_date,
            end_date: data.end_date,
            completed: data.completed,
        }
    }

    /// Returns the process identifier.
    #[must_use]
    pub const fn id(&self) -> ProcessId {
        self.id
    }

    /// Returns the owning task, or `None` for a detached process.
    #[must_use]
    pub const fn owner(&self) -> Option<TaskId> {
        self.owner
    }

    /// Returns the process name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the end date.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Returns whether the process has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Marks the process complete or incomplete.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub(super) const fn attach(&mut self, owner: TaskId) {
        self.owner = Some(owner);
    }

    pub(super) const fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// Orders processes for display: by start date with undated processes
    /// last, then by identifier.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        let start_key = |process: &Self| (process.start_date.is_none(), process.start_date);
        start_key(self)
            .cmp(&start_key(other))
            .then_with(|| self.id.cmp(&other.id))
    }
}
