//! Task aggregate root and related task lifecycle types.

use super::{
    Image, ImageId, ParseTaskStatusError, Process, ProcessId, RelatedLink, SortDate,
    TaskDomainError, TaskId, TaskTitle, ordering,
};
use crate::genre::domain::GenreId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is listed on the active board.
    Active,
    /// Task has been completed and archived.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Maps the persisted completion flag to a status.
    #[must_use]
    pub const fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Active
        }
    }

    /// Returns `true` for [`TaskStatus::Completed`].
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Editable scalar fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// Task title.
    pub title: TaskTitle,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Optional genre reference.
    pub genre_id: Option<GenreId>,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional task-level end date; takes precedence in ordering.
    pub end_date: Option<NaiveDate>,
}

impl TaskDetails {
    /// Creates details carrying only a title.
    #[must_use]
    pub const fn new(title: TaskTitle) -> Self {
        Self {
            title,
            description: None,
            genre_id: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Task aggregate root.
///
/// Owns its processes, related links, and images by value. Children carry
/// the owning [`TaskId`] as a back-reference once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    genre_id: Option<GenreId>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    status: TaskStatus,
    completed_at: Option<DateTime<Utc>>,
    processes: Vec<Process>,
    related_links: Vec<RelatedLink>,
    images: Vec<Image>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted scalar fields.
    pub details: TaskDetails,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Timestamp of the latest completion, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted processes.
    pub processes: Vec<Process>,
    /// Persisted related links.
    pub related_links: Vec<RelatedLink>,
    /// Persisted images.
    pub images: Vec<Image>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Stored revision the aggregate was read at.
    pub version: u64,
}

impl Task {
    /// Creates an active task with no children.
    #[must_use]
    pub fn new(title: TaskTitle, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title,
            description: None,
            genre_id: None,
            start_date: None,
            end_date: None,
            status: TaskStatus::Active,
            completed_at: None,
            processes: Vec::new(),
            related_links: Vec::new(),
            images: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        }
    }

    /// Creates an active task populated with the given details.
    #[must_use]
    pub fn with_details(details: TaskDetails, clock: &impl Clock) -> Self {
        let mut task = Self::new(details.title.clone(), clock);
        task.assign_details(details);
        task
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// Children are re-attached to this task's identifier.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let mut task = Self {
            id: data.id,
            title: data.details.title.clone(),
            description: None,
            genre_id: None,
            start_date: None,
            end_date: None,
            status: data.status,
            completed_at: data.completed_at,
            processes: Vec::new(),
            related_links: Vec::new(),
            images: Vec::new(),
            created_at: data.created_at,
            updated_at: data.updated_at,
            version: data.version,
        };
        task.assign_details(data.details);
        task.replace_processes(data.processes);
        task.replace_related_links(data.related_links);
        for image in data.images {
            task.add_image(image);
        }
        task
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the referenced genre, if any.
    #[must_use]
    pub const fn genre_id(&self) -> Option<GenreId> {
        self.genre_id
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the task-level end date, if any.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns `true` once the task has been completed and not reverted.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns the timestamp of the latest completion.
    ///
    /// Reverting a task keeps this value.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns processes in collection order.
    #[must_use]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Returns processes ordered by start date then identifier.
    #[must_use]
    pub fn processes_in_display_order(&self) -> Vec<&Process> {
        let mut ordered: Vec<&Process> = self.processes.iter().collect();
        ordered.sort_by(|left, right| left.display_cmp(right));
        ordered
    }

    /// Returns related links in insertion order.
    #[must_use]
    pub fn related_links(&self) -> &[RelatedLink] {
        &self.related_links
    }

    /// Returns images in insertion order.
    #[must_use]
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the stored revision this aggregate was read at.
    ///
    /// New tasks start at zero. Repositories reject a save whose version no
    /// longer matches the stored one.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the derived date used to rank this task on the active board.
    #[must_use]
    pub fn sort_date(&self) -> SortDate {
        ordering::compute_sort_date(self)
    }

    /// Replaces the title.
    pub fn rename(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description. Blank text clears it.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description.filter(|text| !text.trim().is_empty());
        self.touch(clock);
    }

    /// Replaces the genre reference.
    pub fn set_genre(&mut self, genre_id: Option<GenreId>, clock: &impl Clock) {
        self.genre_id = genre_id;
        self.touch(clock);
    }

    /// Replaces the start date.
    pub fn set_start_date(&mut self, start_date: Option<NaiveDate>, clock: &impl Clock) {
        self.start_date = start_date;
        self.touch(clock);
    }

    /// Replaces the task-level end date.
    pub fn set_end_date(&mut self, end_date: Option<NaiveDate>, clock: &impl Clock) {
        self.end_date = end_date;
        self.touch(clock);
    }

    /// Adds a process and makes this task its owner.
    ///
    /// Adding a process whose identifier is already present is a no-op.
    pub fn add_process(&mut self, mut process: Process) -> ProcessId {
        let process_id = process.id();
        if self.processes.iter().any(|owned| owned.id() == process_id) {
            return process_id;
        }
        process.attach(self.id);
        self.processes.push(process);
        process_id
    }

    /// Replaces every process with the given list.
    ///
    /// Previously owned processes become orphans and are deleted by the
    /// repository on the next save. Does not refresh `updated_at`.
    pub fn replace_processes(&mut self, processes: impl IntoIterator<Item = Process>) {
        self.processes.clear();
        for process in processes {
            self.add_process(process);
        }
    }

    /// Adds a related link and makes this task its owner.
    ///
    /// Adding a link whose identifier is already present is a no-op.
    pub fn add_related_link(&mut self, mut link: RelatedLink) {
        if self.related_links.iter().any(|owned| owned.id() == link.id()) {
            return;
        }
        link.attach(self.id);
        self.related_links.push(link);
    }

    /// Replaces every related link with the given list.
    pub fn replace_related_links(&mut self, links: impl IntoIterator<Item = RelatedLink>) {
        self.related_links.clear();
        for link in links {
            self.add_related_link(link);
        }
    }

    /// Adds an image record and makes this task its owner.
    ///
    /// Adding an image whose identifier is already present is a no-op.
    pub fn add_image(&mut self, mut image: Image) {
        if self.images.iter().any(|owned| owned.id() == image.id()) {
            return;
        }
        image.attach(self.id);
        self.images.push(image);
    }

    /// Detaches an image record and returns it.
    ///
    /// Saving the task does not delete detached images; callers remove the
    /// record through the repository explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ImageNotFound`] when the image is not
    /// attached to this task.
    pub fn remove_image(
        &mut self,
        image_id: ImageId,
        clock: &impl Clock,
    ) -> Result<Image, TaskDomainError> {
        let position = self
            .images
            .iter()
            .position(|image| image.id() == image_id)
            .ok_or(TaskDomainError::ImageNotFound(image_id))?;
        let removed = self.images.remove(position);
        self.touch(clock);
        Ok(removed)
    }

    /// Flips a process between complete and incomplete.
    ///
    /// Returns the new completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ProcessNotFound`] when the process is not
    /// owned by this task.
    pub fn toggle_process(
        &mut self,
        process_id: ProcessId,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        let process = self
            .processes
            .iter_mut()
            .find(|process| process.id() == process_id)
            .ok_or(TaskDomainError::ProcessNotFound(process_id))?;
        let completed = process.toggle();
        self.touch(clock);
        Ok(completed)
    }

    /// Moves an active task to [`TaskStatus::Completed`] and stamps
    /// `completed_at`.
    ///
    /// Returns `false` without changes when the task is already completed.
    pub fn mark_completed(&mut self, clock: &impl Clock) -> bool {
        if self.status.is_completed() {
            return false;
        }
        let timestamp = clock.utc();
        self.status = TaskStatus::Completed;
        self.completed_at = Some(timestamp);
        self.updated_at = timestamp;
        true
    }

    /// Moves a completed task back to [`TaskStatus::Active`].
    ///
    /// `completed_at` keeps the latest completion time. Returns `false`
    /// without changes when the task is already active.
    pub fn revert(&mut self, clock: &impl Clock) -> bool {
        if !self.status.is_completed() {
            return false;
        }
        self.status = TaskStatus::Active;
        self.touch(clock);
        true
    }

    fn assign_details(&mut self, details: TaskDetails) {
        let TaskDetails {
            title,
            description,
            genre_id,
            start_date,
            end_date,
        } = details;
        self.title = title;
        self.description = description.filter(|text| !text.trim().is_empty());
        self.genre_id = genre_id;
        self.start_date = start_date;
        self.end_date = end_date;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
