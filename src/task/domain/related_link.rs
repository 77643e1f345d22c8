//! Related links attached to a task.

use super::{RelatedLinkId, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};

/// Named URL related to a task, such as a design file or a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    id: RelatedLinkId,
    owner: Option<TaskId>,
    name: String,
    url: String,
}

/// Parameter object for reconstructing a persisted related link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRelatedLinkData {
    /// Persisted link identifier.
    pub id: RelatedLinkId,
    /// Owning task identifier.
    pub task_id: TaskId,
    /// Display name.
    pub name: String,
    /// Target URL.
    pub url: String,
}

impl RelatedLink {
    /// Longest URL accepted, matching the `VARCHAR(1000)` column.
    pub const MAX_URL_LENGTH: usize = 1000;

    /// Creates a detached related link.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRelatedLinkName`] or
    /// [`TaskDomainError::EmptyRelatedLinkUrl`] for blank values, and
    /// [`TaskDomainError::RelatedLinkUrlTooLong`] when the URL exceeds
    /// [`Self::MAX_URL_LENGTH`] characters.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw_name = name.into();
        let raw_url = url.into();
        let trimmed_name = raw_name.trim();
        let trimmed_url = raw_url.trim();

        if trimmed_name.is_empty() {
            return Err(TaskDomainError::EmptyRelatedLinkName);
        }
        if trimmed_url.is_empty() {
            return Err(TaskDomainError::EmptyRelatedLinkUrl);
        }
        let length = trimmed_url.chars().count();
        if length > Self::MAX_URL_LENGTH {
            return Err(TaskDomainError::RelatedLinkUrlTooLong {
                length,
                max: Self::MAX_URL_LENGTH,
            });
        }

        Ok(Self {
            id: RelatedLinkId::new(),
            owner: None,
            name: trimmed_name.to_owned(),
            url: trimmed_url.to_owned(),
        })
    }

    /// Reconstructs a related link from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRelatedLinkData) -> Self {
        Self {
            id: data.id,
            owner: Some(data.task_id),
            name: data.name,
            url: data.url,
        }
    }

    /// Returns the link identifier.
    #[must_use]
    pub const fn id(&self) -> RelatedLinkId {
        self.id
    }

    /// Returns the owning task, or `None` for a detached link.
    #[must_use]
    pub const fn owner(&self) -> Option<TaskId> {
        self.owner
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(super) const fn attach(&mut self, owner: TaskId) {
        self.owner = Some(owner);
    }
}
