//! Service layer for maintaining the genre catalog.

use crate::genre::{
    domain::{Genre, GenreDomainError, GenreId, GenreName},
    ports::{GenreRepository, GenreRepositoryError},
};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Genres created by [`GenreCatalogService::seed_defaults`] on an empty
/// catalog.
pub const DEFAULT_GENRES: [&str; 3] = ["Design", "Coding", "Illustration"];

/// Service-level errors for genre catalog operations.
#[derive(Debug, Error)]
pub enum GenreCatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] GenreDomainError),
    /// Genre repository operation failed.
    #[error(transparent)]
    Repository(#[from] GenreRepositoryError),
    /// Task reference lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// The genre does not exist.
    #[error("genre not found: {0}")]
    NotFound(GenreId),
    /// The genre is still referenced by at least one task.
    #[error("genre {0} is referenced by existing tasks")]
    InUse(GenreId),
}

/// Result type for genre catalog operations.
pub type GenreCatalogResult<T> = Result<T, GenreCatalogError>;

/// Genre catalog orchestration service.
#[derive(Clone)]
pub struct GenreCatalogService<G, T, C>
where
    G: GenreRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    genres: Arc<G>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<G, T, C> GenreCatalogService<G, T, C>
where
    G: GenreRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new genre catalog service.
    #[must_use]
    pub const fn new(genres: Arc<G>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            genres,
            tasks,
            clock,
        }
    }

    /// Creates a genre.
    ///
    /// # Errors
    ///
    /// Returns [`GenreCatalogError::Domain`] when the name is invalid, or
    /// [`GenreCatalogError::Repository`] when the name is taken or
    /// persistence fails.
    pub async fn create(&self, name: &str) -> GenreCatalogResult<Genre> {
        let genre = Genre::new(GenreName::new(name)?, &*self.clock);
        self.genres.store(&genre).await?;
        tracing::info!(genre_id = %genre.id(), name = %genre.name(), "genre created");
        Ok(genre)
    }

    /// Returns every genre, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GenreCatalogError::Repository`] when persistence lookup
    /// fails.
    pub async fn list(&self) -> GenreCatalogResult<Vec<Genre>> {
        Ok(self.genres.list().await?)
    }

    /// Deletes a genre that no task references.
    ///
    /// The reference check and the delete are separate repository calls. The
    /// `PostgreSQL` schema closes the gap with `ON DELETE RESTRICT`; the
    /// in-memory adapters do not, so a task saved between the two calls can
    /// be left pointing at a deleted genre there.
    ///
    /// # Errors
    ///
    /// Returns [`GenreCatalogError::InUse`] when a task still references the
    /// genre and [`GenreCatalogError::NotFound`] when it does not exist.
    pub async fn delete(&self, id: GenreId) -> GenreCatalogResult<()> {
        if self.tasks.references_genre(id).await? {
            return Err(GenreCatalogError::InUse(id));
        }
        if !self.genres.delete(id).await? {
            return Err(GenreCatalogError::NotFound(id));
        }
        tracing::info!(genre_id = %id, "genre deleted");
        Ok(())
    }

    /// Seeds [`DEFAULT_GENRES`] when the catalog is empty.
    ///
    /// Returns the genres created, which is empty when the catalog already
    /// held at least one genre.
    ///
    /// # Errors
    ///
    /// Returns [`GenreCatalogError::Repository`] when persistence fails.
    pub async fn seed_defaults(&self) -> GenreCatalogResult<Vec<Genre>> {
        if self.genres.count().await? > 0 {
            tracing::debug!("genre catalog already populated; skipping seed");
            return Ok(Vec::new());
        }
        let mut seeded = Vec::with_capacity(DEFAULT_GENRES.len());
        for name in DEFAULT_GENRES {
            seeded.push(self.create(name).await?);
        }
        Ok(seeded)
    }
}
