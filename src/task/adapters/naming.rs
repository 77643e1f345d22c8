//! Stored filename generation shared by the image store adapters.

use crate::task::{domain::StoredFilename, ports::ImageStoreError};
use uuid::Uuid;

const FALLBACK_STEM: &str = "image";

/// Generates a unique `<uuid>_<sanitized original>` object name.
///
/// Path separators and reserved characters are stripped from the original
/// name so the result is always a single path component.
pub(super) fn generate_stored_filename(original: &str) -> Result<StoredFilename, ImageStoreError> {
    let sanitized = sanitize_filename::sanitize(original.trim());
    let stem = if sanitized.trim().is_empty() {
        FALLBACK_STEM
    } else {
        sanitized.trim()
    };
    let candidate = format!("{}_{stem}", Uuid::new_v4());
    StoredFilename::new(candidate).map_err(|err| ImageStoreError::InvalidFilename(err.to_string()))
}
