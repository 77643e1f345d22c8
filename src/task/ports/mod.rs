//! Port contracts for task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod image_store;
pub mod repository;

pub use image_store::{ImageStore, ImageStoreError, ImageStoreResult, ImageUpload};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};

#[cfg(test)]
pub use image_store::MockImageStore;
#[cfg(test)]
pub use repository::MockTaskRepository;
