//! In-memory integration tests for the task lifecycle.

use super::helpers::{InMemoryApp, app, date};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use taskmanager::task::{
    domain::{Process, ProcessDraft, RelatedLinkDraft, SortDate},
    services::{TaskInput, TaskLifecycleError},
};

fn titles(tasks: &[taskmanager::task::domain::Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title().as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn form_rows_become_a_ranked_task(app: InMemoryApp) -> eyre::Result<()> {
    let processes = ProcessDraft::from_form_rows(
        &["Thumbnails", "", "Final art"],
        &["2025-01-02", "", ""],
        &["2025-01-10", "", "2025-01-05"],
    )?;
    let links = RelatedLinkDraft::from_form_rows(
        &["Moodboard", ""],
        &["https://example.com/mood", ""],
    )?;
    let input = TaskInput::new("Album cover")
        .with_processes(processes)
        .with_related_links(links);

    let created = app.service.create_task(input).await?.into_task();

    ensure!(created.processes().len() == 2, "blank row skipped");
    ensure!(created.related_links().len() == 1, "blank link row skipped");
    ensure!(
        created.sort_date() == SortDate::Due(date(2025, 1, 5)),
        "earliest process end date ranks the task"
    );
    let display: Vec<&str> = created
        .processes_in_display_order()
        .into_iter()
        .map(Process::name)
        .collect();
    ensure!(
        display == ["Thumbnails", "Final art"],
        "dated processes first: {display:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toggling_processes_reorders_the_board(app: InMemoryApp) -> eyre::Result<()> {
    let urgent = app
        .service
        .create_task(TaskInput::new("Urgent").with_processes([
            ProcessDraft::new("Proof", None, Some(date(2025, 1, 3))),
            ProcessDraft::new("Bind", None, Some(date(2025, 2, 20))),
        ]))
        .await?
        .into_task();
    app.service
        .create_task(TaskInput::new("Steady").with_end_date(date(2025, 2, 1)))
        .await?;

    let before = app.service.active_tasks().await?;
    ensure!(titles(&before) == ["Urgent", "Steady"], "urgent leads");

    let proof = urgent
        .processes()
        .first()
        .map(Process::id)
        .ok_or_eyre("urgent has processes")?;
    app.service.toggle_process(proof).await?;

    let after = app.service.active_tasks().await?;
    ensure!(
        titles(&after) == ["Steady", "Urgent"],
        "completed process no longer counts: {:?}",
        titles(&after)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_tasks_move_to_the_archive_and_back(app: InMemoryApp) -> eyre::Result<()> {
    let first = app
        .service
        .create_task(TaskInput::new("Flyer"))
        .await?
        .into_task();
    let second = app
        .service
        .create_task(TaskInput::new("Banner"))
        .await?
        .into_task();

    app.service.complete_task(first.id()).await?;
    app.service.complete_task(second.id()).await?;
    let archive = app.service.archived_tasks().await?;
    ensure!(
        titles(&archive) == ["Banner", "Flyer"],
        "latest completion first"
    );
    ensure!(app.service.active_tasks().await?.is_empty(), "board empty");

    app.service.revert_task(first.id()).await?;
    let board = app.service.active_tasks().await?;
    ensure!(titles(&board) == ["Flyer"], "reverted task is active again");
    let reverted = board.first().ok_or_eyre("one active task")?;
    ensure!(
        reverted.completed_at().is_some(),
        "completion time survives a revert"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn editing_replaces_processes_and_keeps_images(app: InMemoryApp) -> eyre::Result<()> {
    use taskmanager::task::ports::ImageUpload;

    let created = app
        .service
        .create_task(
            TaskInput::new("Catalogue")
                .with_processes([ProcessDraft::new("Shoot", None, Some(date(2025, 4, 1)))])
                .with_images([ImageUpload::new("front.jpg", b"jpeg".to_vec())]),
        )
        .await?
        .into_task();

    let edited = app
        .service
        .update_task(
            created.id(),
            TaskInput::new("Catalogue 2025").with_description("Spring range"),
        )
        .await?
        .into_task();

    ensure!(edited.title().as_str() == "Catalogue 2025", "title edited");
    ensure!(edited.description() == Some("Spring range"), "description set");
    ensure!(edited.processes().is_empty(), "processes replaced by none");
    ensure!(edited.images().len() == 1, "images are never dropped by an edit");
    ensure!(edited.sort_date() == SortDate::NoDeadline, "no deadline left");
    ensure!(app.images.len() == 1, "file still stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_edit_leaves_the_task_untouched(app: InMemoryApp) -> eyre::Result<()> {
    let created = app
        .service
        .create_task(TaskInput::new("Catalogue").with_end_date(date(2025, 4, 1)))
        .await?
        .into_task();

    let result = app
        .service
        .update_task(
            created.id(),
            TaskInput::new("Catalogue").with_related_links([RelatedLinkDraft::new(
                "Too long",
                format!("https://{}", "x".repeat(1000)),
            )]),
        )
        .await;

    ensure!(
        matches!(result, Err(TaskLifecycleError::Domain(_))),
        "expected a validation error, got {result:?}"
    );
    let stored = app
        .service
        .find_by_id(created.id())
        .await?
        .ok_or_eyre("task still exists")?;
    ensure!(stored == created, "stored task unchanged");
    Ok(())
}
