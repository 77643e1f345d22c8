//! Domain model for task management.
//!
//! The task aggregate owns its processes, related links, and images and is
//! reduced to a single [`SortDate`] for ranking. Infrastructure concerns stay
//! outside of the domain boundary.

mod draft;
mod error;
mod ids;
mod image;
pub mod ordering;
mod process;
mod related_link;
mod task;

pub use draft::{ProcessDraft, RelatedLinkDraft, parse_optional_date};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{ImageId, ProcessId, RelatedLinkId, TaskId, TaskTitle};
pub use image::{Image, PersistedImageData, StoredFilename};
pub use ordering::SortDate;
pub use process::{PersistedProcessData, Process};
pub use related_link::{PersistedRelatedLinkData, RelatedLink};
pub use task::{PersistedTaskData, Task, TaskDetails, TaskStatus};
