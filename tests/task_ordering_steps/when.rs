//! When steps for board ordering BDD scenarios.

use super::world::{TaskOrderingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the active board is loaded")]
fn load_active_board(world: &mut TaskOrderingWorld) -> Result<(), eyre::Report> {
    world.board = run_async(world.service.active_tasks()).wrap_err("load active board")?;
    Ok(())
}

#[when(r#"the task "{title}" is completed"#)]
fn complete_task(world: &mut TaskOrderingWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    run_async(world.service.complete_task(task_id)).wrap_err("complete task in scenario")?;
    Ok(())
}
