//! Repository port for genre persistence and lookup.

use crate::genre::domain::{Genre, GenreId, GenreName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for genre repository operations.
pub type GenreRepositoryResult<T> = Result<T, GenreRepositoryError>;

/// Genre persistence contract.
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Stores a new genre.
    ///
    /// # Errors
    ///
    /// Returns [`GenreRepositoryError::DuplicateGenre`] when the identifier
    /// exists or [`GenreRepositoryError::DuplicateName`] when another genre
    /// already uses the name.
    async fn store(&self, genre: &Genre) -> GenreRepositoryResult<()>;

    /// Finds a genre by identifier.
    ///
    /// Returns `None` when the genre does not exist.
    async fn find_by_id(&self, id: GenreId) -> GenreRepositoryResult<Option<Genre>>;

    /// Returns every genre, oldest first.
    async fn list(&self) -> GenreRepositoryResult<Vec<Genre>>;

    /// Deletes a genre.
    ///
    /// Returns `false` when the genre did not exist.
    async fn delete(&self, id: GenreId) -> GenreRepositoryResult<bool>;

    /// Returns the number of stored genres.
    async fn count(&self) -> GenreRepositoryResult<u64>;
}

/// Errors returned by genre repository implementations.
#[derive(Debug, Clone, Error)]
pub enum GenreRepositoryError {
    /// A genre with the same identifier already exists.
    #[error("duplicate genre identifier: {0}")]
    DuplicateGenre(GenreId),

    /// A genre with the same name already exists.
    #[error("duplicate genre name: {0}")]
    DuplicateName(GenreName),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GenreRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
