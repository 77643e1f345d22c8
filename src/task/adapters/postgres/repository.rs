//! `PostgreSQL` repository implementation for the task aggregate.
//!
//! Each save or delete runs in one transaction. Child tables are written
//! explicitly: processes and related links are upserted and their orphans
//! deleted, while image rows are only ever upserted. Updates are guarded by
//! the `version` column so a stale aggregate cannot overwrite newer state.

use super::{
    models::{ImageRow, NewTaskRow, ProcessRow, RelatedLinkRow, TaskChangeset, TaskRow},
    schema::{task_images, task_processes, task_related_links, tasks},
};
use crate::genre::domain::GenreId;
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::task::{
    domain::{
        Image, ImageId, PersistedImageData, PersistedProcessData, PersistedRelatedLinkData,
        PersistedTaskData, Process, ProcessId, RelatedLink, RelatedLinkId, StoredFilename, Task,
        TaskDetails, TaskId, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

/// Rows for one aggregate, ready to write.
struct AggregateRows {
    task: NewTaskRow,
    processes: Vec<ProcessRow>,
    related_links: Vec<RelatedLinkRow>,
    images: Vec<ImageRow>,
}

impl AggregateRows {
    fn from_task(task: &Task) -> TaskRepositoryResult<Self> {
        let task_id = task.id().into_inner();
        let processes = task
            .processes()
            .iter()
            .enumerate()
            .map(|(index, process)| {
                Ok(ProcessRow {
                    id: process.id().into_inner(),
                    task_id,
                    position: position(index)?,
                    name: process.name().to_owned(),
                    start_date: process.start_date(),
                    end_date: process.end_date(),
                    completed: process.is_completed(),
                })
            })
            .collect::<TaskRepositoryResult<Vec<_>>>()?;
        let related_links = task
            .related_links()
            .iter()
            .enumerate()
            .map(|(index, link)| {
                Ok(RelatedLinkRow {
                    id: link.id().into_inner(),
                    task_id,
                    position: position(index)?,
                    name: link.name().to_owned(),
                    url: link.url().to_owned(),
                })
            })
            .collect::<TaskRepositoryResult<Vec<_>>>()?;
        let images = task
            .images()
            .iter()
            .enumerate()
            .map(|(index, image)| {
                Ok(ImageRow {
                    id: image.id().into_inner(),
                    task_id,
                    position: position(index)?,
                    stored_filename: image.stored_filename().as_str().to_owned(),
                    original_filename: image.original_filename().to_owned(),
                })
            })
            .collect::<TaskRepositoryResult<Vec<_>>>()?;

        Ok(Self {
            task: NewTaskRow {
                id: task_id,
                title: task.title().as_str().to_owned(),
                description: task.description().map(str::to_owned),
                genre_id: task.genre_id().map(GenreId::into_inner),
                start_date: task.start_date(),
                end_date: task.end_date(),
                completed: task.is_completed(),
                completed_at: task.completed_at(),
                created_at: task.created_at(),
                updated_at: task.updated_at(),
                version: stored_version(task.version())?,
            },
            processes,
            related_links,
            images,
        })
    }

    fn changeset(&self) -> TaskChangeset {
        TaskChangeset {
            title: self.task.title.clone(),
            description: self.task.description.clone(),
            genre_id: self.task.genre_id,
            start_date: self.task.start_date,
            end_date: self.task.end_date,
            completed: self.task.completed,
            completed_at: self.task.completed_at,
            updated_at: self.task.updated_at,
            version: self.task.version + 1,
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let rows = AggregateRows::from_task(task)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                if task_exists(tx, task_id)? {
                    return Err(TaskRepositoryError::DuplicateTask(task_id));
                }
                ensure_children_unowned(tx, &rows)?;
                diesel::insert_into(tasks::table)
                    .values(&rows.task)
                    .execute(tx)?;
                upsert_children(tx, &rows)?;
                Ok(())
            })
        })
        .await?;
        tracing::debug!(task_id = %task_id, "task stored");
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let rows = AggregateRows::from_task(task)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let applied = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task_id.into_inner()))
                        .filter(tasks::version.eq(rows.task.version)),
                )
                .set(&rows.changeset())
                .execute(tx)?;
                if applied == 0 {
                    return Err(rejected_update(tx, task_id, rows.task.version)?);
                }
                ensure_children_unowned(tx, &rows)?;
                remove_orphans(tx, &rows)?;
                upsert_children(tx, &rows)?;
                Ok(())
            })
        })
        .await?;
        tracing::debug!(task_id = %task_id, "task updated");
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| load_task(connection, id.into_inner()))
            .await
    }

    async fn find_by_process_id(&self, id: ProcessId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let owner = task_processes::table
                .find(id.into_inner())
                .select(task_processes::task_id)
                .first::<Uuid>(connection)
                .optional()?;
            owner.map_or(Ok(None), |task_id| load_task(connection, task_id))
        })
        .await
    }

    async fn find_by_image_id(&self, id: ImageId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let owner = task_images::table
                .find(id.into_inner())
                .select(task_images::task_id)
                .first::<Uuid>(connection)
                .optional()?;
            owner.map_or(Ok(None), |task_id| load_task(connection, task_id))
        })
        .await
    }

    async fn find_by_completion(&self, completed: bool) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::completed.eq(completed))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            hydrate(connection, rows)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let task_uuid = id.into_inner();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let Some(task) = load_task(tx, task_uuid)? else {
                    return Ok(None);
                };
                diesel::delete(task_processes::table.filter(task_processes::task_id.eq(task_uuid)))
                    .execute(tx)?;
                diesel::delete(
                    task_related_links::table.filter(task_related_links::task_id.eq(task_uuid)),
                )
                .execute(tx)?;
                diesel::delete(task_images::table.filter(task_images::task_id.eq(task_uuid)))
                    .execute(tx)?;
                diesel::delete(tasks::table.find(task_uuid)).execute(tx)?;
                Ok(Some(task))
            })
        })
        .await
    }

    async fn delete_image(
        &self,
        id: ImageId,
        touched_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let owner = diesel::delete(task_images::table.find(id.into_inner()))
                    .returning(task_images::task_id)
                    .get_result::<Uuid>(tx)
                    .optional()?;
                let Some(owner) = owner else {
                    return Ok(false);
                };
                diesel::update(tasks::table.find(owner))
                    .set((
                        tasks::updated_at.eq(touched_at),
                        tasks::version.eq(tasks::version + 1),
                    ))
                    .execute(tx)?;
                Ok(true)
            })
        })
        .await
    }

    async fn references_genre(&self, genre_id: GenreId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let referenced = diesel::select(diesel::dsl::exists(
                tasks::table.filter(tasks::genre_id.eq(genre_id.into_inner())),
            ))
            .get_result::<bool>(connection)?;
            Ok(referenced)
        })
        .await
    }
}

fn position(index: usize) -> TaskRepositoryResult<i32> {
    i32::try_from(index).map_err(TaskRepositoryError::persistence)
}

fn stored_version(version: u64) -> TaskRepositoryResult<i64> {
    i64::try_from(version).map_err(TaskRepositoryError::persistence)
}

fn loaded_version(version: i64) -> TaskRepositoryResult<u64> {
    u64::try_from(version).map_err(TaskRepositoryError::persistence)
}

/// Explains why a version-guarded update touched no row.
fn rejected_update(
    connection: &mut PgConnection,
    task_id: TaskId,
    expected: i64,
) -> TaskRepositoryResult<TaskRepositoryError> {
    let stored = tasks::table
        .find(task_id.into_inner())
        .select(tasks::version)
        .first::<i64>(connection)
        .optional()?;
    let Some(actual) = stored else {
        return Ok(TaskRepositoryError::NotFound(task_id));
    };
    Ok(TaskRepositoryError::StaleTask {
        id: task_id,
        expected: loaded_version(expected)?,
        actual: loaded_version(actual)?,
    })
}

fn task_exists(connection: &mut PgConnection, task_id: TaskId) -> TaskRepositoryResult<bool> {
    let count: i64 = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .count()
        .get_result(connection)?;
    Ok(count > 0)
}

fn reject_foreign_owner(conflict: Option<(Uuid, Uuid)>) -> TaskRepositoryResult<()> {
    match conflict {
        Some((child_id, owner)) => Err(TaskRepositoryError::ChildOwnedByOtherTask {
            child_id,
            owner: TaskId::from_uuid(owner),
        }),
        None => Ok(()),
    }
}

/// Fails when any child row in `rows` already belongs to another task.
fn ensure_children_unowned(
    connection: &mut PgConnection,
    rows: &AggregateRows,
) -> TaskRepositoryResult<()> {
    let owner = rows.task.id;

    let process_ids: Vec<Uuid> = rows.processes.iter().map(|row| row.id).collect();
    let process_conflict = task_processes::table
        .filter(task_processes::id.eq_any(process_ids))
        .filter(task_processes::task_id.ne(owner))
        .select((task_processes::id, task_processes::task_id))
        .first::<(Uuid, Uuid)>(connection)
        .optional()?;
    reject_foreign_owner(process_conflict)?;

    let link_ids: Vec<Uuid> = rows.related_links.iter().map(|row| row.id).collect();
    let link_conflict = task_related_links::table
        .filter(task_related_links::id.eq_any(link_ids))
        .filter(task_related_links::task_id.ne(owner))
        .select((task_related_links::id, task_related_links::task_id))
        .first::<(Uuid, Uuid)>(connection)
        .optional()?;
    reject_foreign_owner(link_conflict)?;

    let image_ids: Vec<Uuid> = rows.images.iter().map(|row| row.id).collect();
    let image_conflict = task_images::table
        .filter(task_images::id.eq_any(image_ids))
        .filter(task_images::task_id.ne(owner))
        .select((task_images::id, task_images::task_id))
        .first::<(Uuid, Uuid)>(connection)
        .optional()?;
    reject_foreign_owner(image_conflict)
}

/// Deletes processes and links the aggregate no longer holds.
fn remove_orphans(connection: &mut PgConnection, rows: &AggregateRows) -> TaskRepositoryResult<()> {
    let owner = rows.task.id;

    let kept_processes: Vec<Uuid> = rows.processes.iter().map(|row| row.id).collect();
    let removed_processes = diesel::delete(
        task_processes::table
            .filter(task_processes::task_id.eq(owner))
            .filter(task_processes::id.ne_all(kept_processes)),
    )
    .execute(connection)?;

    let kept_links: Vec<Uuid> = rows.related_links.iter().map(|row| row.id).collect();
    let removed_links = diesel::delete(
        task_related_links::table
            .filter(task_related_links::task_id.eq(owner))
            .filter(task_related_links::id.ne_all(kept_links)),
    )
    .execute(connection)?;

    if removed_processes + removed_links > 0 {
        tracing::debug!(
            task_id = %owner,
            removed_processes,
            removed_links,
            "orphaned children deleted"
        );
    }
    Ok(())
}

fn upsert_children(connection: &mut PgConnection, rows: &AggregateRows) -> TaskRepositoryResult<()> {
    if !rows.processes.is_empty() {
        diesel::insert_into(task_processes::table)
            .values(&rows.processes)
            .on_conflict(task_processes::id)
            .do_update()
            .set((
                task_processes::position.eq(excluded(task_processes::position)),
                task_processes::name.eq(excluded(task_processes::name)),
                task_processes::start_date.eq(excluded(task_processes::start_date)),
                task_processes::end_date.eq(excluded(task_processes::end_date)),
                task_processes::completed.eq(excluded(task_processes::completed)),
            ))
            .execute(connection)?;
    }
    if !rows.related_links.is_empty() {
        diesel::insert_into(task_related_links::table)
            .values(&rows.related_links)
            .on_conflict(task_related_links::id)
            .do_update()
            .set((
                task_related_links::position.eq(excluded(task_related_links::position)),
                task_related_links::name.eq(excluded(task_related_links::name)),
                task_related_links::url.eq(excluded(task_related_links::url)),
            ))
            .execute(connection)?;
    }
    if !rows.images.is_empty() {
        // Image records are immutable apart from their position.
        diesel::insert_into(task_images::table)
            .values(&rows.images)
            .on_conflict(task_images::id)
            .do_update()
            .set(task_images::position.eq(excluded(task_images::position)))
            .execute(connection)?;
    }
    Ok(())
}

fn load_task(connection: &mut PgConnection, id: Uuid) -> TaskRepositoryResult<Option<Task>> {
    let row = tasks::table
        .find(id)
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut loaded = hydrate(connection, vec![row])?;
    Ok(loaded.pop())
}

/// Loads the children of every row and assembles the aggregates, keeping
/// the order of `rows`.
fn hydrate(connection: &mut PgConnection, rows: Vec<TaskRow>) -> TaskRepositoryResult<Vec<Task>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let task_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let mut processes: HashMap<Uuid, Vec<Process>> = HashMap::new();
    let process_rows = task_processes::table
        .filter(task_processes::task_id.eq_any(task_ids.clone()))
        .order((task_processes::position.asc(), task_processes::id.asc()))
        .select(ProcessRow::as_select())
        .load::<ProcessRow>(connection)?;
    for row in process_rows {
        processes
            .entry(row.task_id)
            .or_default()
            .push(row_to_process(row));
    }

    let mut related_links: HashMap<Uuid, Vec<RelatedLink>> = HashMap::new();
    let link_rows = task_related_links::table
        .filter(task_related_links::task_id.eq_any(task_ids.clone()))
        .order((task_related_links::position.asc(), task_related_links::id.asc()))
        .select(RelatedLinkRow::as_select())
        .load::<RelatedLinkRow>(connection)?;
    for row in link_rows {
        related_links
            .entry(row.task_id)
            .or_default()
            .push(row_to_related_link(row));
    }

    let mut images: HashMap<Uuid, Vec<Image>> = HashMap::new();
    let image_rows = task_images::table
        .filter(task_images::task_id.eq_any(task_ids))
        .order((task_images::position.asc(), task_images::id.asc()))
        .select(ImageRow::as_select())
        .load::<ImageRow>(connection)?;
    for row in image_rows {
        let task_id = row.task_id;
        images.entry(task_id).or_default().push(row_to_image(row)?);
    }

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            row_to_task(
                row,
                processes.remove(&id).unwrap_or_default(),
                related_links.remove(&id).unwrap_or_default(),
                images.remove(&id).unwrap_or_default(),
            )
        })
        .collect()
}

fn row_to_task(
    row: TaskRow,
    processes: Vec<Process>,
    related_links: Vec<RelatedLink>,
    images: Vec<Image>,
) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        genre_id,
        start_date,
        end_date,
        completed,
        completed_at,
        created_at,
        updated_at,
        version,
    } = row;

    let mut details =
        TaskDetails::new(TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?);
    details.description = description;
    details.genre_id = genre_id.map(GenreId::from_uuid);
    details.start_date = start_date;
    details.end_date = end_date;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        details,
        status: TaskStatus::from_completed(completed),
        completed_at,
        processes,
        related_links,
        images,
        created_at,
        updated_at,
        version: loaded_version(version)?,
    }))
}

fn row_to_process(row: ProcessRow) -> Process {
    Process::from_persisted(PersistedProcessData {
        id: ProcessId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        name: row.name,
        start_date: row.start_date,
        end_date: row.end_date,
        completed: row.completed,
    })
}

fn row_to_related_link(row: RelatedLinkRow) -> RelatedLink {
    RelatedLink::from_persisted(PersistedRelatedLinkData {
        id: RelatedLinkId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        name: row.name,
        url: row.url,
    })
}

fn row_to_image(row: ImageRow) -> TaskRepositoryResult<Image> {
    let stored_filename =
        StoredFilename::new(row.stored_filename).map_err(TaskRepositoryError::persistence)?;
    Ok(Image::from_persisted(PersistedImageData {
        id: ImageId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        stored_filename,
        original_filename: row.original_filename,
    }))
}
