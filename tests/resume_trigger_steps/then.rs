//! Then steps for resume trigger BDD scenarios.

use std::time::Duration;

use super::world::{ResumeWorld, run_async};
use rstest_bdd_macros::then;
use tasklane::task::{
    domain::{Column, HistoryAction},
    ports::CommentRepository,
    services::{ResumeError, ResumeOutcome},
};

#[then(r#"the task is in "{column}""#)]
fn task_is_in(world: &ResumeWorld, column: String) -> Result<(), eyre::Report> {
    let expected = Column::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid expected column in scenario: {err}"))?;
    let task_id = world.task()?.id();
    let stored = run_async(world.lifecycle.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} disappeared"))?;
    eyre::ensure!(
        stored.column() == expected,
        "expected column {expected}, found {}",
        stored.column()
    );
    Ok(())
}

#[then(r#"the "{tool}" command is launched for session "{session_ref}""#)]
fn command_launched(
    world: &mut ResumeWorld,
    tool: String,
    session_ref: String,
) -> Result<(), eyre::Report> {
    let command = run_async(tokio::time::timeout(
        Duration::from_secs(5),
        world.launches.recv(),
    ))?
    .ok_or_else(|| eyre::eyre!("launch channel closed"))?;
    eyre::ensure!(command.program() == tool, "unexpected program: {command}");
    eyre::ensure!(
        command.args().contains(&session_ref),
        "session {session_ref} missing from {command}"
    );
    Ok(())
}

#[then("no command is launched")]
fn no_command_launched(world: &mut ResumeWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.launches.try_recv().is_err(),
        "a command was launched unexpectedly"
    );
    Ok(())
}

#[then("the task history ends with an automatic resume entry")]
fn history_ends_with_resume(world: &ResumeWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.lifecycle.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} disappeared"))?;
    let entry = stored
        .history()
        .last()
        .ok_or_else(|| eyre::eyre!("task has no history"))?;
    eyre::ensure!(
        entry.action() == HistoryAction::AutoResumed,
        "expected auto_resumed entry, found {:?}",
        entry.action()
    );
    let comment_id = world.last_comment()?.comment.id().to_string();
    eyre::ensure!(
        entry.metadata().get("trigger_comment").and_then(|value| value.as_str())
            == Some(comment_id.as_str()),
        "entry does not name the triggering comment"
    );
    Ok(())
}

#[then(r#"the comment is skipped because "{reason}""#)]
fn comment_skipped(world: &ResumeWorld, reason: String) -> Result<(), eyre::Report> {
    match &world.last_comment()?.resume {
        Ok(ResumeOutcome::Skipped(skip)) if skip.as_str() == reason => Ok(()),
        other => Err(eyre::eyre!("expected skip {reason}, got {other:?}")),
    }
}

#[then("the resume fails with an unsupported tool error")]
fn resume_fails_unsupported(world: &ResumeWorld) -> Result<(), eyre::Report> {
    let result = &world.last_comment()?.resume;
    eyre::ensure!(
        matches!(result, Err(ResumeError::UnsupportedTool(_))),
        "expected UnsupportedTool error, got {result:?}"
    );
    Ok(())
}

#[then("the comment is stored")]
fn comment_is_stored(world: &ResumeWorld) -> Result<(), eyre::Report> {
    let comment_id = world.last_comment()?.comment.id();
    let stored = run_async(world.comment_store.find_by_id(comment_id))?;
    eyre::ensure!(stored.is_some(), "comment {comment_id} was not stored");
    Ok(())
}
