//! Genre entity.

use super::{GenreId, GenreName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A named category that tasks can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    id: GenreId,
    name: GenreName,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGenreData {
    /// Persisted identifier.
    pub id: GenreId,
    /// Persisted name.
    pub name: GenreName,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Genre {
    /// Creates a new genre.
    #[must_use]
    pub fn new(name: GenreName, clock: &impl Clock) -> Self {
        Self {
            id: GenreId::new(),
            name,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a genre from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedGenreData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            created_at: data.created_at,
        }
    }

    /// Returns the genre identifier.
    #[must_use]
    pub const fn id(&self) -> GenreId {
        self.id
    }

    /// Returns the genre name.
    #[must_use]
    pub const fn name(&self) -> &GenreName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
