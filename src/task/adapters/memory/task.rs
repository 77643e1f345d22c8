//! In-memory repository for the task aggregate.
//!
//! Children live in their own maps keyed by identifier and point back to
//! their owner, mirroring the relational layout. Every write validates the
//! whole aggregate before touching state, so a rejected save leaves nothing
//! behind. Each record carries a version; `update` only applies to the
//! version it was read at.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::genre::domain::GenreId;
use crate::task::{
    domain::{
        Image, ImageId, PersistedTaskData, Process, ProcessId, RelatedLink, RelatedLinkId, Task,
        TaskDetails, TaskId, TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use chrono::{DateTime, Utc};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    insertion_order: Vec<TaskId>,
    tasks: HashMap<TaskId, TaskRecord>,
    processes: HashMap<ProcessId, Process>,
    related_links: HashMap<RelatedLinkId, RelatedLink>,
    images: HashMap<ImageId, Image>,
}

/// Scalar task columns plus the ordered child keys.
#[derive(Debug, Clone)]
struct TaskRecord {
    details: TaskDetails,
    status: TaskStatus,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
    process_ids: Vec<ProcessId>,
    related_link_ids: Vec<RelatedLinkId>,
    image_ids: Vec<ImageId>,
}

impl TaskRecord {
    fn from_task(task: &Task, image_ids: Vec<ImageId>, version: u64) -> Self {
        let mut details = TaskDetails::new(task.title().clone());
        details.description = task.description().map(str::to_owned);
        details.genre_id = task.genre_id();
        details.start_date = task.start_date();
        details.end_date = task.end_date();
        Self {
            details,
            status: task.status(),
            completed_at: task.completed_at(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            version,
            process_ids: task.processes().iter().map(Process::id).collect(),
            related_link_ids: task.related_links().iter().map(RelatedLink::id).collect(),
            image_ids,
        }
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored processes across all tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn process_count(&self) -> TaskRepositoryResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.processes.len())
    }

    /// Returns the number of stored related links across all tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn related_link_count(&self) -> TaskRepositoryResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.related_links.len())
    }

    /// Returns the number of stored image records across all tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn image_count(&self) -> TaskRepositoryResult<usize> {
        Ok(self.state.read().map_err(lock_error)?.images.len())
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn check_owner(
    child_id: Uuid,
    owner: Option<TaskId>,
    task_id: TaskId,
) -> TaskRepositoryResult<()> {
    match owner {
        Some(existing) if existing != task_id => Err(TaskRepositoryError::ChildOwnedByOtherTask {
            child_id,
            owner: existing,
        }),
        _ => Ok(()),
    }
}

impl InMemoryTaskState {
    /// Rejects the save when any child identifier is owned by another task.
    fn check_child_ownership(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        for process in task.processes() {
            let owner = self.processes.get(&process.id()).and_then(Process::owner);
            check_owner(process.id().into_inner(), owner, task_id)?;
        }
        for link in task.related_links() {
            let owner = self.related_links.get(&link.id()).and_then(RelatedLink::owner);
            check_owner(link.id().into_inner(), owner, task_id)?;
        }
        for image in task.images() {
            let owner = self.images.get(&image.id()).and_then(Image::owner);
            check_owner(image.id().into_inner(), owner, task_id)?;
        }
        Ok(())
    }

    fn write_children(&mut self, task: &Task) {
        for process in task.processes() {
            self.processes.insert(process.id(), process.clone());
        }
        for link in task.related_links() {
            self.related_links.insert(link.id(), link.clone());
        }
        for image in task.images() {
            self.images.insert(image.id(), image.clone());
        }
    }

    fn hydrate(&self, task_id: TaskId) -> Option<Task> {
        let record = self.tasks.get(&task_id)?;
        let processes = record
            .process_ids
            .iter()
            .filter_map(|id| self.processes.get(id).cloned())
            .collect();
        let related_links = record
            .related_link_ids
            .iter()
            .filter_map(|id| self.related_links.get(id).cloned())
            .collect();
        let images = record
            .image_ids
            .iter()
            .filter_map(|id| self.images.get(id).cloned())
            .collect();
        Some(Task::from_persisted(PersistedTaskData {
            id: task_id,
            details: record.details.clone(),
            status: record.status,
            completed_at: record.completed_at,
            processes,
            related_links,
            images,
            created_at: record.created_at,
            updated_at: record.updated_at,
            version: record.version,
        }))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.check_child_ownership(task)?;

        let image_ids = task.images().iter().map(Image::id).collect();
        state.write_children(task);
        state
            .tasks
            .insert(task.id(), TaskRecord::from_task(task, image_ids, task.version()));
        state.insertion_order.push(task.id());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let previous = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .clone();
        if previous.version != task.version() {
            return Err(TaskRepositoryError::StaleTask {
                id: task.id(),
                expected: task.version(),
                actual: previous.version,
            });
        }
        state.check_child_ownership(task)?;

        let next_processes: Vec<ProcessId> = task.processes().iter().map(Process::id).collect();
        for orphan in previous
            .process_ids
            .iter()
            .filter(|id| !next_processes.contains(id))
        {
            state.processes.remove(orphan);
        }
        let next_links: Vec<RelatedLinkId> =
            task.related_links().iter().map(RelatedLink::id).collect();
        for orphan in previous
            .related_link_ids
            .iter()
            .filter(|id| !next_links.contains(id))
        {
            state.related_links.remove(orphan);
        }

        // Images are additive: records absent from the aggregate stay.
        let mut image_ids = previous.image_ids;
        for image in task.images() {
            if !image_ids.contains(&image.id()) {
                image_ids.push(image.id());
            }
        }

        state.write_children(task);
        state.tasks.insert(
            task.id(),
            TaskRecord::from_task(task, image_ids, previous.version + 1),
        );
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.hydrate(id))
    }

    async fn find_by_process_id(&self, id: ProcessId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let owner = state.processes.get(&id).and_then(Process::owner);
        Ok(owner.and_then(|task_id| state.hydrate(task_id)))
    }

    async fn find_by_image_id(&self, id: ImageId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let owner = state.images.get(&id).and_then(Image::owner);
        Ok(owner.and_then(|task_id| state.hydrate(task_id)))
    }

    async fn find_by_completion(&self, completed: bool) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let tasks = state
            .insertion_order
            .iter()
            .filter(|id| {
                state
                    .tasks
                    .get(*id)
                    .is_some_and(|record| record.status.is_completed() == completed)
            })
            .filter_map(|id| state.hydrate(*id))
            .collect();
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(removed) = state.hydrate(id) else {
            return Ok(None);
        };
        let Some(record) = state.tasks.remove(&id) else {
            return Ok(None);
        };
        for process_id in &record.process_ids {
            state.processes.remove(process_id);
        }
        for link_id in &record.related_link_ids {
            state.related_links.remove(link_id);
        }
        for image_id in &record.image_ids {
            state.images.remove(image_id);
        }
        state.insertion_order.retain(|task_id| *task_id != id);
        Ok(Some(removed))
    }

    async fn delete_image(
        &self,
        id: ImageId,
        touched_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(image) = state.images.remove(&id) else {
            return Ok(false);
        };
        if let Some(record) = image
            .owner()
            .and_then(|owner| state.tasks.get_mut(&owner))
        {
            record.image_ids.retain(|image_id| *image_id != id);
            record.updated_at = touched_at;
            record.version += 1;
        }
        Ok(true)
    }

    async fn references_genre(&self, genre_id: GenreId) -> TaskRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .tasks
            .values()
            .any(|record| record.details.genre_id == Some(genre_id)))
    }
}
