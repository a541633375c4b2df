//! Behaviour tests for comment-driven agent resumption.

#[path = "resume_trigger_steps/mod.rs"]
mod resume_trigger_steps_defs;

use resume_trigger_steps_defs::world::{ResumeWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/resume_trigger.feature",
    name = "A human mention resumes a waiting agent"
)]
#[tokio::test(flavor = "multi_thread")]
async fn human_mention_resumes_agent(world: ResumeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resume_trigger.feature",
    name = "Boards with manual resume ignore mentions"
)]
#[tokio::test(flavor = "multi_thread")]
async fn manual_boards_ignore_mentions(world: ResumeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resume_trigger.feature",
    name = "Comments without a mention are ignored"
)]
#[tokio::test(flavor = "multi_thread")]
async fn comments_without_mention_are_ignored(world: ResumeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resume_trigger.feature",
    name = "Agents replying to themselves do not resume"
)]
#[tokio::test(flavor = "multi_thread")]
async fn agent_comments_do_not_resume(world: ResumeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resume_trigger.feature",
    name = "Tasks without an agent session stay waiting"
)]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_without_session_stay_waiting(world: ResumeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resume_trigger.feature",
    name = "Unsupported tools fail the resume but keep the comment"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unsupported_tools_keep_comment(world: ResumeWorld) {
    let _ = world;
}
