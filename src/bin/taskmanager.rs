//! Bootstraps the task manager against `PostgreSQL`.
//!
//! Usage:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/taskmanager taskmanager
//! ```
//!
//! The binary reads configuration (a `.env` file is honoured), builds the
//! connection pool, applies the schema, seeds the default genres into an
//! empty catalog, and logs the ranked active board.

use std::sync::Arc;

use mockable::DefaultClock;
use taskmanager::config::AppConfig;
use taskmanager::genre::{
    adapters::postgres::PostgresGenreRepository, services::GenreCatalogService,
};
use taskmanager::postgres::{apply_migrations, build_pool};
use taskmanager::task::{
    adapters::{fs::FilesystemImageStore, postgres::PostgresTaskRepository},
    services::TaskLifecycleService,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_LOG_FILTER: &str = "taskmanager=info";

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // A missing .env file is not an error.
    let _env_file = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        upload_dir = %config.upload_dir(),
        pool_size = config.pool_size(),
        "configuration loaded"
    );

    let pool = build_pool(config.database_url(), config.pool_size())?;
    let migration_pool = pool.clone();
    tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
        let mut connection = migration_pool.get()?;
        apply_migrations(&mut connection)?;
        Ok(())
    })
    .await??;
    tracing::info!("database schema ready");

    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(PostgresTaskRepository::new(pool.clone()));
    let genres = Arc::new(PostgresGenreRepository::new(pool));
    let images = Arc::new(FilesystemImageStore::open(config.upload_dir().to_owned())?);

    let catalog = GenreCatalogService::new(
        Arc::clone(&genres),
        Arc::clone(&tasks),
        Arc::clone(&clock),
    );
    let seeded = catalog.seed_defaults().await?;
    if !seeded.is_empty() {
        tracing::info!(count = seeded.len(), "default genres seeded");
    }

    let lifecycle = TaskLifecycleService::new(tasks, genres, images, clock);
    let board = lifecycle.active_tasks().await?;
    tracing::info!(count = board.len(), "active board loaded");
    for task in &board {
        tracing::info!(
            task_id = %task.id(),
            title = %task.title(),
            sort_date = %task.sort_date(),
            "active task"
        );
    }
    Ok(())
}
