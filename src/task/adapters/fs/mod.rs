//! Filesystem adapters for task image bytes.

mod image_store;

pub use image_store::FilesystemImageStore;
