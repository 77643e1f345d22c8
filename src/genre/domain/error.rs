//! Error types for genre validation.

use thiserror::Error;

/// Errors returned while constructing genre values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenreDomainError {
    /// The genre name is empty after trimming.
    #[error("genre name must not be empty")]
    EmptyName,

    /// The genre name exceeds the persisted column length.
    #[error("genre name '{0}' exceeds 255 characters")]
    NameTooLong(String),
}
