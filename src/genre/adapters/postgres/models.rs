//! Diesel row models for genre persistence.

use super::schema::genres;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for genre records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = genres)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenreRow {
    /// Genre identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for genre records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = genres)]
pub struct NewGenreRow {
    /// Genre identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
