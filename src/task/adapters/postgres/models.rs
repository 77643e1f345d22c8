//! Diesel row models for task aggregate persistence.

use super::schema::{task_images, task_processes, task_related_links, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional genre reference.
    pub genre_id: Option<uuid::Uuid>,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional task-level end date.
    pub end_date: Option<NaiveDate>,
    /// Completion flag.
    pub completed: bool,
    /// Timestamp of the latest completion.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub version: i64,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional genre reference.
    pub genre_id: Option<uuid::Uuid>,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional task-level end date.
    pub end_date: Option<NaiveDate>,
    /// Completion flag.
    pub completed: bool,
    /// Timestamp of the latest completion.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub version: i64,
}

/// Changeset for task updates. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional genre reference.
    pub genre_id: Option<uuid::Uuid>,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Optional task-level end date.
    pub end_date: Option<NaiveDate>,
    /// Completion flag.
    pub completed: bool,
    /// Timestamp of the latest completion.
    pub completed_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub version: i64,
}

/// Process row, used for both reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_processes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProcessRow {
    /// Process identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Collection position.
    pub position: i32,
    /// Process name.
    pub name: String,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// Required end date.
    pub end_date: NaiveDate,
    /// Completion flag.
    pub completed: bool,
}

/// Related link row, used for both reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_related_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RelatedLinkRow {
    /// Link identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Collection position.
    pub position: i32,
    /// Display name.
    pub name: String,
    /// Target URL.
    pub url: String,
}

/// Image row, used for both reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImageRow {
    /// Image identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Collection position.
    pub position: i32,
    /// System-generated stored filename.
    pub stored_filename: String,
    /// User-supplied filename.
    pub original_filename: String,
}
