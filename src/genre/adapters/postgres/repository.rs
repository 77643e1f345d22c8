//! `PostgreSQL` repository implementation for the genre catalog.

use super::{
    models::{GenreRow, NewGenreRow},
    schema::genres,
};
use crate::genre::{
    domain::{Genre, GenreId, GenreName, PersistedGenreData},
    ports::{GenreRepository, GenreRepositoryError, GenreRepositoryResult},
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed genre repository.
#[derive(Debug, Clone)]
pub struct PostgresGenreRepository {
    pool: PgPool,
}

impl PostgresGenreRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> GenreRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> GenreRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, GenreRepositoryError::persistence)?;
                f(&mut connection)
            },
            GenreRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl GenreRepository for PostgresGenreRepository {
    async fn store(&self, genre: &Genre) -> GenreRepositoryResult<()> {
        let genre_id = genre.id();
        let name = genre.name().clone();
        let new_row = NewGenreRow {
            id: genre_id.into_inner(),
            name: name.as_str().to_owned(),
            created_at: genre.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(genres::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some("genres_name_unique") =>
                    {
                        GenreRepositoryError::DuplicateName(name.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        GenreRepositoryError::DuplicateGenre(genre_id)
                    }
                    _ => GenreRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: GenreId) -> GenreRepositoryResult<Option<Genre>> {
        self.run_blocking(move |connection| {
            let row = genres::table
                .filter(genres::id.eq(id.into_inner()))
                .select(GenreRow::as_select())
                .first::<GenreRow>(connection)
                .optional()
                .map_err(GenreRepositoryError::persistence)?;
            row.map(row_to_genre).transpose()
        })
        .await
    }

    async fn list(&self) -> GenreRepositoryResult<Vec<Genre>> {
        self.run_blocking(|connection| {
            let rows = genres::table
                .order((genres::created_at.asc(), genres::name.asc()))
                .select(GenreRow::as_select())
                .load::<GenreRow>(connection)
                .map_err(GenreRepositoryError::persistence)?;
            rows.into_iter().map(row_to_genre).collect()
        })
        .await
    }

    async fn delete(&self, id: GenreId) -> GenreRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(genres::table.filter(genres::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(GenreRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn count(&self) -> GenreRepositoryResult<u64> {
        self.run_blocking(|connection| {
            let total: i64 = genres::table
                .count()
                .get_result(connection)
                .map_err(GenreRepositoryError::persistence)?;
            u64::try_from(total).map_err(GenreRepositoryError::persistence)
        })
        .await
    }
}

fn row_to_genre(row: GenreRow) -> GenreRepositoryResult<Genre> {
    let name = GenreName::new(row.name).map_err(GenreRepositoryError::persistence)?;
    Ok(Genre::from_persisted(PersistedGenreData {
        id: GenreId::from_uuid(row.id),
        name,
        created_at: row.created_at,
    }))
}
