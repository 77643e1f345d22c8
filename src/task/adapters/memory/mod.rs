//! In-memory adapters for tests and local development.

mod image_store;
mod task;

pub use image_store::InMemoryImageStore;
pub use task::InMemoryTaskRepository;
