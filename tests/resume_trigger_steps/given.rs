//! Given steps for resume trigger BDD scenarios.

use super::world::{ResumeWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use tasklane::task::{
    domain::{AgentSession, Attribution, Board, BoardPrefix, Column, ResumeMode},
    ports::BoardRepository,
    services::CreateTaskRequest,
};

#[given("a board with {mode} resume")]
fn board_with_resume(world: &mut ResumeWorld, mode: String) -> Result<(), eyre::Report> {
    let resume_mode = match mode.as_str() {
        "automatic" => ResumeMode::Auto,
        "manual" => ResumeMode::Manual,
        other => return Err(eyre::eyre!("unknown resume mode in scenario: {other}")),
    };
    let board = Board::new("Agents", BoardPrefix::new("AGT")?, &DefaultClock)?
        .with_resume_mode(resume_mode);
    run_async(world.boards.store(&board)).wrap_err("store scenario board")?;
    world.board = Some(board);
    Ok(())
}

#[given(r#"a task waiting for input with a "{tool}" session "{session_ref}""#)]
fn task_with_session(
    world: &mut ResumeWorld,
    tool: String,
    session_ref: String,
) -> Result<(), eyre::Report> {
    create_waiting_task(world, Some(AgentSession::new(tool, session_ref)))
}

#[given("a task waiting for input without an agent session")]
fn task_without_session(world: &mut ResumeWorld) -> Result<(), eyre::Report> {
    create_waiting_task(world, None)
}

fn create_waiting_task(
    world: &mut ResumeWorld,
    session: Option<AgentSession>,
) -> Result<(), eyre::Report> {
    let board = world
        .board
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing board in scenario world"))?;
    let request = CreateTaskRequest::new(board.id(), "Rotate the API keys", Attribution::cli())
        .in_column(Column::NeedInput);
    let created = run_async(world.lifecycle.create_task(request)).wrap_err("create task")?;
    let task = run_async(world.lifecycle.set_agent_session(created.id(), session))
        .wrap_err("attach agent session")?;
    world.task = Some(task);
    Ok(())
}
