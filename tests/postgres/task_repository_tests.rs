//! `PostgreSQL` integration tests for task aggregate persistence.

use super::helpers::{BoxError, connect};
use crate::test_helpers::{TickingClock, date};
use taskmanager::genre::{
    domain::{Genre, GenreName},
    ports::GenreRepository,
};
use taskmanager::task::{
    domain::{Image, Process, RelatedLink, StoredFilename, Task, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use uuid::Uuid;

fn populated_task(title: &str, clock: &TickingClock) -> Result<Task, BoxError> {
    let mut task = Task::new(TaskTitle::new(title)?, clock);
    task.set_description(Some("Stored in PostgreSQL".to_owned()), clock);
    task.set_end_date(Some(date(2025, 6, 30)), clock);
    task.add_process(Process::new("Draft", Some(date(2025, 6, 1)), date(2025, 6, 10))?);
    task.add_process(Process::new("Review", None, date(2025, 6, 20))?.with_completed(true));
    task.add_related_link(RelatedLink::new("Mockup", "https://example.com/mockup")?);
    task.add_image(Image::new(
        StoredFilename::new(format!("{}_cover.png", Uuid::new_v4()))?,
        "cover.png",
    ));
    Ok(task)
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_aggregate_round_trips() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let task = populated_task("Round trip", &clock)?;

    context.tasks.store(&task).await?;
    let fetched = context.tasks.find_by_id(task.id()).await?;

    assert_eq!(fetched.as_ref(), Some(&task));
    context.tasks.delete(task.id()).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_duplicate_store_is_rejected() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let task = populated_task("Duplicate", &clock)?;
    context.tasks.store(&task).await?;

    let result = context.tasks.store(&task).await;

    assert!(matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()));
    context.tasks.delete(task.id()).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_update_deletes_orphaned_children() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let mut task = populated_task("Orphans", &clock)?;
    context.tasks.store(&task).await?;
    let old_process_ids: Vec<_> = task.processes().iter().map(Process::id).collect();

    let replacement = Process::new("Rework", None, date(2025, 7, 1))?;
    let replacement_id = replacement.id();
    task.replace_processes([replacement]);
    task.replace_related_links(Vec::new());
    context.tasks.update(&task).await?;

    for process_id in old_process_ids {
        assert!(context.tasks.find_by_process_id(process_id).await?.is_none());
    }
    let fetched = context
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or("task should exist")?;
    let ids: Vec<_> = fetched.processes().iter().map(Process::id).collect();
    assert_eq!(ids, vec![replacement_id]);
    assert!(fetched.related_links().is_empty());
    context.tasks.delete(task.id()).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_outdated_update_cannot_restore_a_deleted_image() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let task = populated_task("Stale copy", &clock)?;
    context.tasks.store(&task).await?;
    let mut outdated = context
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or("task should exist")?;
    let image_id = outdated.images().first().map(Image::id).ok_or("one image")?;
    let touched_at = clock.utc();

    assert!(context.tasks.delete_image(image_id, touched_at).await?);
    outdated.set_description(Some("Lost edit".to_owned()), &clock);
    let result = context.tasks.update(&outdated).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::StaleTask { id, expected: 0, actual: 1 }) if id == task.id()
    ));
    let fetched = context
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or("task should exist")?;
    assert!(fetched.images().is_empty());
    assert_eq!(fetched.description(), Some("Stored in PostgreSQL"));
    assert_eq!(fetched.updated_at(), touched_at);
    assert_eq!(fetched.version(), 1);
    context.tasks.delete(task.id()).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_images_are_additive_until_deleted() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let mut task = populated_task("Images", &clock)?;
    context.tasks.store(&task).await?;
    let first_id = task.images().first().map(Image::id).ok_or("one image")?;

    task.remove_image(first_id, &clock)?;
    task.add_image(Image::new(
        StoredFilename::new(format!("{}_back.png", Uuid::new_v4()))?,
        "back.png",
    ));
    context.tasks.update(&task).await?;

    let fetched = context
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or("task should exist")?;
    assert_eq!(fetched.images().len(), 2);

    assert!(context.tasks.delete_image(first_id, clock.utc()).await?);
    assert!(!context.tasks.delete_image(first_id, clock.utc()).await?);
    let trimmed = context
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or("task should exist")?;
    let originals: Vec<&str> = trimmed
        .images()
        .iter()
        .map(Image::original_filename)
        .collect();
    assert_eq!(originals, vec!["back.png"]);
    context.tasks.delete(task.id()).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_rejects_children_owned_by_another_task() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let owner = populated_task("Owner", &clock)?;
    context.tasks.store(&owner).await?;
    let contested = owner.processes().first().cloned().ok_or("owner has processes")?;

    let mut thief = Task::new(TaskTitle::new("Thief")?, &clock);
    thief.add_process(contested.clone());
    let result = context.tasks.store(&thief).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::ChildOwnedByOtherTask { child_id, owner: found })
            if child_id == contested.id().into_inner() && found == owner.id()
    ));
    assert!(context.tasks.find_by_id(thief.id()).await?.is_none());
    context.tasks.delete(owner.id()).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_delete_cascades_to_children() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let task = populated_task("Cascade", &clock)?;
    context.tasks.store(&task).await?;
    let process_id = task.processes().first().map(Process::id).ok_or("process")?;
    let image_id = task.images().first().map(Image::id).ok_or("image")?;

    let removed = context.tasks.delete(task.id()).await?;

    assert_eq!(removed.as_ref(), Some(&task));
    assert!(context.tasks.find_by_id(task.id()).await?.is_none());
    assert!(context.tasks.find_by_process_id(process_id).await?.is_none());
    assert!(context.tasks.find_by_image_id(image_id).await?.is_none());
    assert!(context.tasks.delete(task.id()).await?.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_completion_filter_and_genre_references() -> Result<(), BoxError> {
    let Some(context) = connect().await? else {
        return Ok(());
    };
    let clock = TickingClock::default();
    let genre = Genre::new(GenreName::new(format!("Genre {}", Uuid::new_v4()))?, &clock);
    context.genres.store(&genre).await?;

    let mut task = Task::new(TaskTitle::new("Filed")?, &clock);
    task.set_genre(Some(genre.id()), &clock);
    task.mark_completed(&clock);
    context.tasks.store(&task).await?;

    let completed = context.tasks.find_by_completion(true).await?;
    let active = context.tasks.find_by_completion(false).await?;
    assert!(completed.iter().any(|found| found.id() == task.id()));
    assert!(active.iter().all(|found| found.id() != task.id()));
    assert!(context.tasks.references_genre(genre.id()).await?);

    context.tasks.delete(task.id()).await?;
    assert!(!context.tasks.references_genre(genre.id()).await?);
    context.genres.delete(genre.id()).await?;
    Ok(())
}
