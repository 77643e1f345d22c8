//! Shared world state for board ordering BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskmanager::genre::adapters::memory::InMemoryGenreRepository;
use taskmanager::task::{
    adapters::memory::{InMemoryImageStore, InMemoryTaskRepository},
    domain::{Task, TaskId},
    services::TaskLifecycleService,
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryGenreRepository,
    InMemoryImageStore,
    DefaultClock,
>;

/// Scenario world for board ordering behaviour tests.
pub struct TaskOrderingWorld {
    pub service: TestTaskService,
    pub tasks_by_title: HashMap<String, TaskId>,
    pub board: Vec<Task>,
}

impl TaskOrderingWorld {
    /// Creates a world with an empty task store.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryGenreRepository::new()),
            Arc::new(InMemoryImageStore::new()),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            tasks_by_title: HashMap::new(),
            board: Vec::new(),
        }
    }

    /// Looks up a task created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no task with the title was created.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks_by_title
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} in scenario world"))
    }
}

impl Default for TaskOrderingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskOrderingWorld {
    TaskOrderingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
