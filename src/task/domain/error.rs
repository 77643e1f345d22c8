//! Error types for task domain validation and parsing.

use super::{ImageId, ProcessId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A process name is empty after trimming.
    #[error("process name must not be empty")]
    EmptyProcessName,

    /// A named process was submitted without an end date.
    #[error("process '{0}' requires an end date")]
    MissingProcessEndDate(String),

    /// A date field could not be parsed as an ISO-8601 calendar date.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A related link name is empty after trimming.
    #[error("related link name must not be empty")]
    EmptyRelatedLinkName,

    /// A related link URL is empty after trimming.
    #[error("related link URL must not be empty")]
    EmptyRelatedLinkUrl,

    /// A related link row supplied only one of name and URL.
    #[error("related link row requires both a name and a URL")]
    IncompleteRelatedLink,

    /// A related link URL exceeds the persisted column length.
    #[error("related link URL is {length} characters long, limit is {max}")]
    RelatedLinkUrlTooLong {
        /// Length of the rejected URL in characters.
        length: usize,
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// An image filename is empty.
    #[error("image filename must not be empty")]
    EmptyImageFilename,

    /// The process is not part of this task.
    #[error("process {0} does not belong to this task")]
    ProcessNotFound(ProcessId),

    /// The image is not part of this task.
    #[error("image {0} does not belong to this task")]
    ImageNotFound(ImageId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
