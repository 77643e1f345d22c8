//! Given steps for board ordering BDD scenarios.

use super::world::{TaskOrderingWorld, run_async};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskmanager::task::{
    domain::{ProcessDraft, parse_optional_date},
    services::TaskInput,
};

fn parse_date(raw: &str) -> Result<NaiveDate, eyre::Report> {
    parse_optional_date(raw)?.ok_or_else(|| eyre::eyre!("scenario date must not be blank"))
}

fn create_task(world: &mut TaskOrderingWorld, input: TaskInput) -> Result<(), eyre::Report> {
    let created = run_async(world.service.create_task(input))
        .wrap_err("create task for ordering scenario")?
        .into_task();
    world
        .tasks_by_title
        .insert(created.title().as_str().to_owned(), created.id());
    Ok(())
}

/// Appends a process while keeping the existing ones and their flags.
fn append_process(
    world: &TaskOrderingWorld,
    title: &str,
    name: String,
    end: &str,
    completed: bool,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(title)?;
    let task = run_async(world.service.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {title:?} vanished from the store"))?;

    let mut drafts: Vec<ProcessDraft> = task
        .processes()
        .iter()
        .map(|process| {
            ProcessDraft::new(process.name(), process.start_date(), Some(process.end_date()))
        })
        .collect();
    let mut completed_names: Vec<String> = task
        .processes()
        .iter()
        .filter(|process| process.is_completed())
        .map(|process| process.name().to_owned())
        .collect();
    if completed {
        completed_names.push(name.clone());
    }
    drafts.push(ProcessDraft::new(name, None, Some(parse_date(end)?)));

    let mut input = TaskInput::new(title).with_processes(drafts);
    if let Some(end_date) = task.end_date() {
        input = input.with_end_date(end_date);
    }
    let updated = run_async(world.service.update_task(task_id, input))
        .wrap_err("append process in ordering scenario")?
        .into_task();

    for process in updated.processes() {
        if completed_names.iter().any(|done| done == process.name()) {
            run_async(world.service.toggle_process(process.id()))
                .wrap_err("complete process in ordering scenario")?;
        }
    }
    Ok(())
}

#[given(r#"a task "{title}" with a process "{name}" ending "{end}""#)]
fn task_with_process(
    world: &mut TaskOrderingWorld,
    title: String,
    name: String,
    end: String,
) -> Result<(), eyre::Report> {
    let input = TaskInput::new(title)
        .with_processes([ProcessDraft::new(name, None, Some(parse_date(&end)?))]);
    create_task(world, input)
}

#[given(r#"a task "{title}" due "{end}""#)]
fn task_due(
    world: &mut TaskOrderingWorld,
    title: String,
    end: String,
) -> Result<(), eyre::Report> {
    let input = TaskInput::new(title).with_end_date(parse_date(&end)?);
    create_task(world, input)
}

#[given(r#"a task "{title}" without a deadline"#)]
fn task_without_deadline(world: &mut TaskOrderingWorld, title: String) -> Result<(), eyre::Report> {
    create_task(world, TaskInput::new(title))
}

#[given(r#"the task "{title}" has a process "{name}" ending "{end}""#)]
fn task_has_process(
    world: &mut TaskOrderingWorld,
    title: String,
    name: String,
    end: String,
) -> Result<(), eyre::Report> {
    append_process(world, &title, name, &end, false)
}

#[given(r#"the task "{title}" has a completed process "{name}" ending "{end}""#)]
fn task_has_completed_process(
    world: &mut TaskOrderingWorld,
    title: String,
    name: String,
    end: String,
) -> Result<(), eyre::Report> {
    append_process(world, &title, name, &end, true)
}
