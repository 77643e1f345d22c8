//! Service layer for task creation, editing, completion, and removal.

use crate::genre::{
    domain::GenreId,
    ports::{GenreRepository, GenreRepositoryError},
};
use crate::task::{
    domain::{
        Image, ImageId, Process, ProcessDraft, ProcessId, RelatedLink, RelatedLinkDraft,
        StoredFilename, Task, TaskDetails, TaskDomainError, TaskId, TaskTitle,
        ordering::{archived, rank_active},
    },
    ports::{ImageStore, ImageStoreError, ImageUpload, TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    title: String,
    description: Option<String>,
    genre_id: Option<GenreId>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    processes: Vec<ProcessDraft>,
    related_links: Vec<RelatedLinkDraft>,
    images: Vec<ImageUpload>,
}

impl TaskInput {
    /// Creates input carrying only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            genre_id: None,
            start_date: None,
            end_date: None,
            processes: Vec::new(),
            related_links: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the requested genre.
    #[must_use]
    pub const fn with_genre(mut self, genre_id: GenreId) -> Self {
        self.genre_id = Some(genre_id);
        self
    }

    /// Sets the start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the task-level end date.
    #[must_use]
    pub const fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Sets the process drafts; on update these replace every process.
    #[must_use]
    pub fn with_processes(mut self, processes: impl IntoIterator<Item = ProcessDraft>) -> Self {
        self.processes = processes.into_iter().collect();
        self
    }

    /// Sets the related link drafts; on update these replace every link.
    #[must_use]
    pub fn with_related_links(
        mut self,
        related_links: impl IntoIterator<Item = RelatedLinkDraft>,
    ) -> Self {
        self.related_links = related_links.into_iter().collect();
        self
    }

    /// Sets image uploads; on update these are added to existing images.
    #[must_use]
    pub fn with_images(mut self, images: impl IntoIterator<Item = ImageUpload>) -> Self {
        self.images = images.into_iter().collect();
        self
    }
}

/// Upload that could not be stored.
#[derive(Debug, Clone)]
pub struct RejectedImage {
    original_filename: String,
    reason: ImageStoreError,
}

impl RejectedImage {
    /// Returns the user-supplied filename of the rejected upload.
    #[must_use]
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Returns the storage error.
    #[must_use]
    pub const fn reason(&self) -> &ImageStoreError {
        &self.reason
    }
}

/// Outcome of a create or update.
///
/// The task was saved; `rejected_images` lists uploads that were dropped.
#[derive(Debug, Clone)]
pub struct TaskMutation {
    task: Task,
    rejected_images: Vec<RejectedImage>,
}

impl TaskMutation {
    /// Returns the saved task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns uploads that could not be stored.
    #[must_use]
    pub fn rejected_images(&self) -> &[RejectedImage] {
        &self.rejected_images
    }

    /// Returns `true` when every upload was stored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rejected_images.is_empty()
    }

    /// Consumes the outcome and returns the saved task.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }
}

/// Outcome of a task deletion.
#[derive(Debug, Clone)]
pub struct TaskDeletion {
    task: Task,
    retained_files: Vec<StoredFilename>,
}

impl TaskDeletion {
    /// Returns the removed aggregate.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns image files that could not be removed from storage.
    #[must_use]
    pub fn retained_files(&self) -> &[StoredFilename] {
        &self.retained_files
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed, including a save that lost a race
    /// with another request ([`TaskRepositoryError::StaleTask`]).
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Genre lookup failed.
    #[error(transparent)]
    Genre(#[from] GenreRepositoryError),
    /// No task has the given identifier.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// No task owns the given process.
    #[error("process not found: {0}")]
    ProcessNotFound(ProcessId),
    /// No task owns the given image.
    #[error("image not found: {0}")]
    ImageNotFound(ImageId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Validated children extracted from a [`TaskInput`].
struct ValidatedInput {
    title: TaskTitle,
    description: Option<String>,
    genre_id: Option<GenreId>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    processes: Vec<Process>,
    related_links: Vec<RelatedLink>,
    images: Vec<ImageUpload>,
}

impl TryFrom<TaskInput> for ValidatedInput {
    type Error = TaskDomainError;

    fn try_from(input: TaskInput) -> Result<Self, Self::Error> {
        let TaskInput {
            title,
            description,
            genre_id,
            start_date,
            end_date,
            processes,
            related_links,
            images,
        } = input;
        Ok(Self {
            title: TaskTitle::new(title)?,
            description,
            genre_id,
            start_date,
            end_date,
            processes: processes
                .into_iter()
                .map(ProcessDraft::into_process)
                .collect::<Result<_, _>>()?,
            related_links: related_links
                .into_iter()
                .map(RelatedLinkDraft::into_related_link)
                .collect::<Result<_, _>>()?,
            images,
        })
    }
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, G, S, C>
where
    R: TaskRepository,
    G: GenreRepository,
    S: ImageStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    genres: Arc<G>,
    images: Arc<S>,
    clock: Arc<C>,
}

impl<R, G, S, C> TaskLifecycleService<R, G, S, C>
where
    R: TaskRepository,
    G: GenreRepository,
    S: ImageStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, genres: Arc<G>, images: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            repository,
            genres,
            images,
            clock,
        }
    }

    /// Creates a task with its processes, related links, and images.
    ///
    /// An unknown genre leaves the task without a genre. Uploads the image
    /// store rejects are reported in [`TaskMutation::rejected_images`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when validation fails (nothing
    /// is written), or [`TaskLifecycleError::Repository`] when the save
    /// fails, after removing the files written for this request.
    pub async fn create_task(&self, input: TaskInput) -> TaskLifecycleResult<TaskMutation> {
        let validated = ValidatedInput::try_from(input)?;
        let genre_id = match validated.genre_id {
            Some(requested) => self.known_genre(requested).await?,
            None => None,
        };

        let mut details = TaskDetails::new(validated.title);
        details.description = validated.description;
        details.genre_id = genre_id;
        details.start_date = validated.start_date;
        details.end_date = validated.end_date;

        let mut task = Task::with_details(details, &*self.clock);
        task.replace_processes(validated.processes);
        task.replace_related_links(validated.related_links);

        let (stored, rejected_images) = self.store_uploads(validated.images).await;
        for image in &stored {
            task.add_image(image.clone());
        }

        if let Err(err) = self.repository.store(&task).await {
            self.discard_files(&stored).await;
            return Err(err.into());
        }
        tracing::info!(
            task_id = %task.id(),
            processes = task.processes().len(),
            related_links = task.related_links().len(),
            images = task.images().len(),
            "task created"
        );
        Ok(TaskMutation {
            task,
            rejected_images,
        })
    }

    /// Edits a task.
    ///
    /// Scalar fields are overwritten, processes and related links are
    /// replaced wholesale, and uploads are added to the existing images.
    /// `Some(unknown genre)` keeps the current genre; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when validation fails,
    /// [`TaskLifecycleError::TaskNotFound`] when the task does not exist, or
    /// [`TaskLifecycleError::Repository`] when the save fails.
    pub async fn update_task(
        &self,
        id: TaskId,
        input: TaskInput,
    ) -> TaskLifecycleResult<TaskMutation> {
        let validated = ValidatedInput::try_from(input)?;
        let mut task = self.require_task(id).await?;

        let genre_id = match validated.genre_id {
            Some(requested) => self.known_genre(requested).await?.or(task.genre_id()),
            None => None,
        };

        let clock = &*self.clock;
        task.rename(validated.title, clock);
        task.set_description(validated.description, clock);
        task.set_genre(genre_id, clock);
        task.set_start_date(validated.start_date, clock);
        task.set_end_date(validated.end_date, clock);
        task.replace_processes(validated.processes);
        task.replace_related_links(validated.related_links);

        let (stored, rejected_images) = self.store_uploads(validated.images).await;
        for image in &stored {
            task.add_image(image.clone());
        }

        if let Err(err) = self.repository.update(&task).await {
            self.discard_files(&stored).await;
            return Err(err.into());
        }
        tracing::info!(
            task_id = %task.id(),
            processes = task.processes().len(),
            related_links = task.related_links().len(),
            added_images = stored.len(),
            "task updated"
        );
        Ok(TaskMutation {
            task,
            rejected_images,
        })
    }

    /// Marks a task completed and moves it to the archive.
    ///
    /// Completing an already completed task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or [`TaskLifecycleError::Repository`] when the save fails.
    pub async fn complete_task(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.require_task(id).await?;
        if task.mark_completed(&*self.clock) {
            self.repository.update(&task).await?;
            tracing::info!(task_id = %id, "task completed");
        }
        Ok(task)
    }

    /// Moves a completed task back to the active board.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or [`TaskLifecycleError::Repository`] when the save fails.
    pub async fn revert_task(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.require_task(id).await?;
        if task.revert(&*self.clock) {
            self.repository.update(&task).await?;
            tracing::info!(task_id = %id, "task reverted");
        }
        Ok(task)
    }

    /// Deletes a task, its children, and its image files.
    ///
    /// Files that cannot be removed are logged and reported in
    /// [`TaskDeletion::retained_files`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or [`TaskLifecycleError::Repository`] when the delete fails.
    pub async fn delete_task(&self, id: TaskId) -> TaskLifecycleResult<TaskDeletion> {
        let task = self
            .repository
            .delete(id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(id))?;

        let mut retained_files = Vec::new();
        for image in task.images() {
            if let Err(err) = self.images.delete(image.stored_filename()).await {
                tracing::warn!(
                    task_id = %id,
                    stored_filename = %image.stored_filename(),
                    error = %err,
                    "failed to remove image file"
                );
                retained_files.push(image.stored_filename().clone());
            }
        }
        tracing::info!(task_id = %id, images = task.images().len(), "task deleted");
        Ok(TaskDeletion {
            task,
            retained_files,
        })
    }

    /// Flips the completion flag of a process and saves its task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ProcessNotFound`] when no task owns the
    /// process or [`TaskLifecycleError::Repository`] when the save fails.
    pub async fn toggle_process(&self, process_id: ProcessId) -> TaskLifecycleResult<Task> {
        let mut task = self
            .repository
            .find_by_process_id(process_id)
            .await?
            .ok_or(TaskLifecycleError::ProcessNotFound(process_id))?;
        let completed = task.toggle_process(process_id, &*self.clock)?;
        self.repository.update(&task).await?;
        tracing::info!(
            task_id = %task.id(),
            process_id = %process_id,
            completed,
            "process toggled"
        );
        Ok(task)
    }

    /// Removes one image record and its file.
    ///
    /// The record goes first, in a single repository call; the file is only
    /// touched once that has committed. A file that cannot be removed is
    /// logged and left behind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ImageNotFound`] when no task owns the
    /// image (including when it disappears before the delete lands) or
    /// [`TaskLifecycleError::Repository`] when persistence fails, in which
    /// case the file is kept.
    pub async fn delete_image(&self, image_id: ImageId) -> TaskLifecycleResult<Task> {
        let mut task = self
            .repository
            .find_by_image_id(image_id)
            .await?
            .ok_or(TaskLifecycleError::ImageNotFound(image_id))?;
        let removed = task.remove_image(image_id, &*self.clock)?;
        if !self
            .repository
            .delete_image(image_id, task.updated_at())
            .await?
        {
            return Err(TaskLifecycleError::ImageNotFound(image_id));
        }

        if let Err(err) = self.images.delete(removed.stored_filename()).await {
            tracing::warn!(
                task_id = %task.id(),
                stored_filename = %removed.stored_filename(),
                error = %err,
                "failed to remove image file"
            );
        }
        tracing::info!(task_id = %task.id(), image_id = %image_id, "image deleted");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Returns the active board, earliest sort date first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn active_tasks(&self) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.find_by_completion(false).await?;
        Ok(rank_active(tasks))
    }

    /// Returns the archive, most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn archived_tasks(&self) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.find_by_completion(true).await?;
        Ok(archived(tasks))
    }

    async fn require_task(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(id))
    }

    async fn known_genre(&self, requested: GenreId) -> TaskLifecycleResult<Option<GenreId>> {
        let genre = self.genres.find_by_id(requested).await?;
        if genre.is_none() {
            tracing::debug!(genre_id = %requested, "requested genre does not exist");
        }
        Ok(genre.map(|found| found.id()))
    }

    /// Writes uploads through the image store.
    ///
    /// Zero-byte uploads are blank form fields and are skipped silently.
    async fn store_uploads(&self, uploads: Vec<ImageUpload>) -> (Vec<Image>, Vec<RejectedImage>) {
        let mut stored = Vec::new();
        let mut rejected = Vec::new();
        for upload in uploads {
            if upload.is_empty() {
                tracing::debug!(
                    original_filename = upload.original_filename(),
                    "skipping empty upload"
                );
                continue;
            }
            match self.images.save(&upload).await {
                Ok(stored_filename) => {
                    stored.push(Image::new(stored_filename, upload.original_filename()));
                }
                Err(reason) => {
                    tracing::warn!(
                        original_filename = upload.original_filename(),
                        error = %reason,
                        "image upload rejected"
                    );
                    rejected.push(RejectedImage {
                        original_filename: upload.original_filename().to_owned(),
                        reason,
                    });
                }
            }
        }
        (stored, rejected)
    }

    async fn discard_files(&self, images: &[Image]) {
        for image in images {
            if let Err(err) = self.images.delete(image.stored_filename()).await {
                tracing::warn!(
                    stored_filename = %image.stored_filename(),
                    error = %err,
                    "failed to remove image file after rejected save"
                );
            }
        }
    }
}
