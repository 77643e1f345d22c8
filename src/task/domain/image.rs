//! Image attachments recorded against a task.

use super::{ImageId, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// System-generated name under which an image's bytes are stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredFilename(String);

impl StoredFilename {
    /// Creates a stored filename.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyImageFilename`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyImageFilename);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the filename as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StoredFilename {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StoredFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Image attached to a task.
///
/// Only the stored/original filename pair is recorded; the bytes live in an
/// [`ImageStore`](crate::task::ports::ImageStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    id: ImageId,
    owner: Option<TaskId>,
    stored_filename: StoredFilename,
    original_filename: String,
}

/// Parameter object for reconstructing a persisted image record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedImageData {
    /// Persisted image identifier.
    pub id: ImageId,
    /// Owning task identifier.
    pub task_id: TaskId,
    /// Stored filename.
    pub stored_filename: StoredFilename,
    /// User-supplied filename.
    pub original_filename: String,
}

impl Image {
    /// Creates a detached image record.
    #[must_use]
    pub fn new(stored_filename: StoredFilename, original_filename: impl Into<String>) -> Self {
        Self {
            id: ImageId::new(),
            owner: None,
            stored_filename,
            original_filename: original_filename.into(),
        }
    }

    /// Reconstructs an image record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedImageData) -> Self {
        Self {
            id: data.id,
            owner: Some(data.task_id),
            stored_filename: data.stored_filename,
            original_filename: data.original_filename,
        }
    }

    /// Returns the image identifier.
    #[must_use]
    pub const fn id(&self) -> ImageId {
        self.id
    }

    /// Returns the owning task, or `None` for a detached image.
    #[must_use]
    pub const fn owner(&self) -> Option<TaskId> {
        self.owner
    }

    /// Returns the stored filename.
    #[must_use]
    pub const fn stored_filename(&self) -> &StoredFilename {
        &self.stored_filename
    }

    /// Returns the user-supplied filename.
    #[must_use]
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub(super) const fn attach(&mut self, owner: TaskId) {
        self.owner = Some(owner);
    }
}
