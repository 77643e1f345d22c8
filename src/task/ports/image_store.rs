//! File storage port for task image bytes.

use crate::task::domain::StoredFilename;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for image store operations.
pub type ImageStoreResult<T> = Result<T, ImageStoreError>;

/// Raw image upload awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    original_filename: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates an upload from its user-supplied name and contents.
    #[must_use]
    pub fn new(original_filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_filename: original_filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the user-supplied filename.
    #[must_use]
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Returns the upload contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `true` when the upload carries no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Storage contract for image bytes.
///
/// The task core only records the returned [`StoredFilename`]; it never
/// inspects file contents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persists the upload under a freshly generated unique name.
    ///
    /// # Errors
    ///
    /// Returns [`ImageStoreError::EmptyUpload`] for zero-byte uploads and
    /// [`ImageStoreError::Io`] when the bytes cannot be written.
    async fn save(&self, upload: &ImageUpload) -> ImageStoreResult<StoredFilename>;

    /// Removes stored bytes. Deleting a missing object succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ImageStoreError::Io`] when the object exists but cannot be
    /// removed.
    async fn delete(&self, stored_filename: &StoredFilename) -> ImageStoreResult<()>;
}

/// Errors returned by image store implementations.
#[derive(Debug, Clone, Error)]
pub enum ImageStoreError {
    /// The upload contained no bytes.
    #[error("image upload is empty")]
    EmptyUpload,

    /// The stored filename is unusable as an object name.
    #[error("invalid stored filename: {0}")]
    InvalidFilename(String),

    /// Underlying storage failure.
    #[error("image storage error: {0}")]
    Io(Arc<std::io::Error>),
}

impl ImageStoreError {
    /// Wraps an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
