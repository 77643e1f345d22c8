//! In-memory integration tests for genres referenced by tasks.

use super::helpers::{InMemoryApp, app};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use taskmanager::genre::services::GenreCatalogError;
use taskmanager::task::services::TaskInput;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeded_genres_can_be_assigned_to_tasks(app: InMemoryApp) -> eyre::Result<()> {
    let seeded = app.catalog.seed_defaults().await?;
    let coding = seeded
        .iter()
        .find(|genre| genre.name().as_str() == "Coding")
        .ok_or_eyre("Coding is a default genre")?;

    let task = app
        .service
        .create_task(TaskInput::new("Refactor exporter").with_genre(coding.id()))
        .await?
        .into_task();

    ensure!(task.genre_id() == Some(coding.id()), "genre assigned");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn genre_becomes_deletable_once_its_task_is_gone(app: InMemoryApp) -> eyre::Result<()> {
    let genre = app.catalog.create("Lettering").await?;
    let task = app
        .service
        .create_task(TaskInput::new("Shop sign").with_genre(genre.id()))
        .await?
        .into_task();

    let blocked = app.catalog.delete(genre.id()).await;
    ensure!(
        matches!(blocked, Err(GenreCatalogError::InUse(_))),
        "referenced genre is protected, got {blocked:?}"
    );

    app.service.delete_task(task.id()).await?;
    app.catalog.delete(genre.id()).await?;

    ensure!(app.catalog.list().await?.is_empty(), "catalog empty");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clearing_the_genre_releases_it(app: InMemoryApp) -> eyre::Result<()> {
    let genre = app.catalog.create("Lettering").await?;
    let task = app
        .service
        .create_task(TaskInput::new("Shop sign").with_genre(genre.id()))
        .await?
        .into_task();

    app.service
        .update_task(task.id(), TaskInput::new("Shop sign"))
        .await?;
    app.catalog.delete(genre.id()).await?;

    let stored = app
        .service
        .find_by_id(task.id())
        .await?
        .ok_or_eyre("task still exists")?;
    ensure!(stored.genre_id().is_none(), "task has no genre");
    Ok(())
}
