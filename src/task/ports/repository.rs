//! Repository port for task aggregate persistence.
//!
//! Implementations persist a task together with its processes, related
//! links, and images as one atomic unit.

use crate::genre::domain::GenreId;
use crate::task::domain::{ImageId, ProcessId, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task aggregate persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task with all of its children.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::ChildOwnedByOtherTask`] when a child
    /// identifier belongs to another task.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Saves an existing task and advances its stored version.
    ///
    /// Processes and related links are upserted and any previously persisted
    /// process or link missing from the aggregate is deleted. Images are only
    /// ever added here; see [`TaskRepository::delete_image`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist,
    /// [`TaskRepositoryError::StaleTask`] when the stored version differs
    /// from [`Task::version`], or
    /// [`TaskRepositoryError::ChildOwnedByOtherTask`] when a child
    /// identifier belongs to another task. Nothing is written on error.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds the task owning the given process.
    async fn find_by_process_id(&self, id: ProcessId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds the task owning the given image.
    async fn find_by_image_id(&self, id: ImageId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task whose completion flag equals `completed`, oldest
    /// first.
    async fn find_by_completion(&self, completed: bool) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task and all of its children.
    ///
    /// Returns the removed aggregate, or `None` when the task did not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Deletes a single image record and stamps its owner with
    /// `touched_at`, advancing the owner's version in the same unit.
    ///
    /// Returns `false` when the image did not exist; nothing is written then.
    async fn delete_image(
        &self,
        id: ImageId,
        touched_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool>;

    /// Returns `true` when any task references the genre.
    async fn references_genre(&self, genre_id: GenreId) -> TaskRepositoryResult<bool>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task changed in storage after this copy was read.
    #[error("task {id} was modified concurrently (read at version {expected}, stored {actual})")]
    StaleTask {
        /// Identifier of the task.
        id: TaskId,
        /// Version carried by the rejected aggregate.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// A child entity is already owned by a different task.
    #[error("child {child_id} is owned by task {owner}")]
    ChildOwnedByOtherTask {
        /// Identifier of the contested child.
        child_id: Uuid,
        /// Task that currently owns the child.
        owner: TaskId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
