//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Provides the connection pool type, schema bootstrap, and helpers for
//! offloading synchronous Diesel calls to the blocking thread pool.

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

/// `PostgreSQL` connection pool shared by every repository adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Ordered schema migrations as `(name, up.sql)` pairs.
///
/// Every statement is idempotent, so applying the list to an already
/// migrated database is harmless.
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "2026-10-01-000000_create_genres",
        include_str!("../../migrations/2026-10-01-000000_create_genres/up.sql"),
    ),
    (
        "2026-10-01-000001_create_tasks",
        include_str!("../../migrations/2026-10-01-000001_create_tasks/up.sql"),
    ),
];

/// Builds an r2d2 connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot establish its initial
/// connections.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Applies every schema migration in order.
///
/// This is a blocking call; run it from `spawn_blocking` or a synchronous
/// context.
///
/// # Errors
///
/// Returns the first Diesel error raised by a migration script.
pub fn apply_migrations(connection: &mut PgConnection) -> diesel::QueryResult<()> {
    for (name, sql) in MIGRATIONS {
        tracing::debug!(migration = *name, "applying schema migration");
        connection.batch_execute(sql)?;
    }
    Ok(())
}

/// Runs a blocking task and maps join errors into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}
