//! In-memory repository for the genre catalog.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::genre::{
    domain::{Genre, GenreId},
    ports::{GenreRepository, GenreRepositoryError, GenreRepositoryResult},
};

/// Thread-safe in-memory genre repository.
///
/// Genres are kept in insertion order, which doubles as creation order.
/// Nothing here knows about tasks: unlike the `PostgreSQL` foreign key,
/// deleting a genre never fails because a task still references it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenreRepository {
    state: Arc<RwLock<Vec<Genre>>>,
}

impl InMemoryGenreRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> GenreRepositoryError {
    GenreRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl GenreRepository for InMemoryGenreRepository {
    async fn store(&self, genre: &Genre) -> GenreRepositoryResult<()> {
        let mut genres = self.state.write().map_err(lock_error)?;
        if genres.iter().any(|existing| existing.id() == genre.id()) {
            return Err(GenreRepositoryError::DuplicateGenre(genre.id()));
        }
        if genres.iter().any(|existing| existing.name() == genre.name()) {
            return Err(GenreRepositoryError::DuplicateName(genre.name().clone()));
        }
        genres.push(genre.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: GenreId) -> GenreRepositoryResult<Option<Genre>> {
        let genres = self.state.read().map_err(lock_error)?;
        Ok(genres.iter().find(|genre| genre.id() == id).cloned())
    }

    async fn list(&self) -> GenreRepositoryResult<Vec<Genre>> {
        let genres = self.state.read().map_err(lock_error)?;
        Ok(genres.clone())
    }

    async fn delete(&self, id: GenreId) -> GenreRepositoryResult<bool> {
        let mut genres = self.state.write().map_err(lock_error)?;
        let before = genres.len();
        genres.retain(|genre| genre.id() != id);
        Ok(genres.len() != before)
    }

    async fn count(&self) -> GenreRepositoryResult<u64> {
        let genres = self.state.read().map_err(lock_error)?;
        u64::try_from(genres.len()).map_err(GenreRepositoryError::persistence)
    }
}
