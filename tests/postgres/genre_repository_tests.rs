//! `PostgreSQL` integration tests for genre persistence.

use super::helpers::{BoxError, connect};
use crate::test_helpers::TickingClock;
use taskmanager::genre::{
    domain::{Genre, GenreName},
    ports::{GenreRepository, GenreRepositoryError},
};
use taskmanager::task::{
    domain::{Task, TaskTitle},
    ports::TaskRepository,
};
use uuid::Uuid;

fn unique_genre(clock: &TickingClock) -> Result<Genre, BoxError> {
    Ok(Genre::new(
        GenreName::new(format!("Genre {}", Uuid::new_v4()))?,
        clock,
    ))
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_genre_round_trips() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let genre = unique_genre(&clock)?;

    context.genres.store(&genre).await?;

    assert_eq!(context.genres.find_by_id(genre.id()).await?, Some(genre.clone()));
    assert!(context.genres.list().await?.contains(&genre));
    assert!(context.genres.count().await? >= 1);
    assert!(context.genres.delete(genre.id()).await?);
    assert!(!context.genres.delete(genre.id()).await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_genre_names_are_unique() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let genre = unique_genre(&clock)?;
    context.genres.store(&genre).await?;

    let twin = Genre::new(genre.name().clone(), &clock);
    let result = context.genres.store(&twin).await;

    assert!(matches!(result, Err(GenreRepositoryError::DuplicateName(_))));
    context.genres.delete(genre.id()).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_refuses_to_delete_a_referenced_genre() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let genre = unique_genre(&clock)?;
    context.genres.store(&genre).await?;
    let mut task = Task::new(TaskTitle::new("Genre holder")?, &clock);
    task.set_genre(Some(genre.id()), &clock);
    context.tasks.store(&task).await?;

    let result = context.genres.delete(genre.id()).await;

    assert!(matches!(result, Err(GenreRepositoryError::Persistence(_))));
    assert_eq!(context.genres.find_by_id(genre.id()).await?, Some(genre.clone()));
    context.tasks.delete(task.id()).await?;
    assert!(context.genres.delete(genre.id()).await?);
    Ok(())
}
