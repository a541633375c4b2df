//! When steps for resume trigger BDD scenarios.

use super::world::{ResumeWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use tasklane::task::{domain::AuthorType, services::AddCommentRequest};

#[when(r#"a human comments "{content}""#)]
fn human_comments(world: &mut ResumeWorld, content: String) -> Result<(), eyre::Report> {
    add_comment(world, content, AuthorType::Human)
}

#[when(r#"an agent comments "{content}""#)]
fn agent_comments(world: &mut ResumeWorld, content: String) -> Result<(), eyre::Report> {
    add_comment(world, content, AuthorType::Agent)
}

fn add_comment(
    world: &mut ResumeWorld,
    content: String,
    author_type: AuthorType,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let added = run_async(
        world
            .comments
            .add_comment(AddCommentRequest::new(task_id, content, author_type)),
    )
    .wrap_err("add comment")?;
    world.last_comment = Some(added);
    Ok(())
}
