//! Then steps for board ordering BDD scenarios.

use super::world::{TaskOrderingWorld, run_async};
use rstest_bdd_macros::then;
use taskmanager::task::domain::{SortDate, parse_optional_date};

fn split_titles(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .collect()
}

#[then(r#"the task "{title}" has sort date "{expected}""#)]
fn task_has_sort_date(
    world: &TaskOrderingWorld,
    title: String,
    expected: String,
) -> Result<(), eyre::Report> {
    let expected_date = parse_optional_date(&expected)?
        .ok_or_else(|| eyre::eyre!("expected sort date must not be blank"))?;
    let task = world
        .board
        .iter()
        .find(|task| task.title().as_str() == title)
        .ok_or_else(|| eyre::eyre!("task {title:?} is not on the board"))?;

    if task.sort_date() != SortDate::Due(expected_date) {
        return Err(eyre::eyre!(
            "expected sort date {expected_date}, found {}",
            task.sort_date()
        ));
    }
    Ok(())
}

#[then(r#"the board lists "{titles}""#)]
fn board_lists(world: &TaskOrderingWorld, titles: String) -> Result<(), eyre::Report> {
    let actual: Vec<&str> = world
        .board
        .iter()
        .map(|task| task.title().as_str())
        .collect();
    let expected = split_titles(&titles);
    if actual != expected {
        return Err(eyre::eyre!("expected board {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the archive lists "{titles}""#)]
fn archive_lists(world: &TaskOrderingWorld, titles: String) -> Result<(), eyre::Report> {
    let archive = run_async(world.service.archived_tasks())?;
    let actual: Vec<&str> = archive.iter().map(|task| task.title().as_str()).collect();
    let expected = split_titles(&titles);
    if actual != expected {
        return Err(eyre::eyre!("expected archive {expected:?}, found {actual:?}"));
    }
    Ok(())
}
