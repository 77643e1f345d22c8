//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    RejectedImage, TaskDeletion, TaskInput, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, TaskMutation,
};
