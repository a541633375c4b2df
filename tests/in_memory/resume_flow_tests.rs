//! In-memory integration tests for resuming agents from comments.

use super::helpers::{WORK_DIR, Workspace};
use camino::Utf8Path;
use tasklane::task::{
    domain::{Actor, AgentSession, Attribution, AuthorType, Column, HistoryAction, ResumeMode, Task},
    services::{AddCommentRequest, MoveTaskRequest, Placement, ResumeOutcome, SkipReason},
};
use rstest::rstest;

async fn waiting_task(workspace: &Workspace, session: AgentSession) -> Task {
    let task = workspace
        .create("Migrate billing tables", Column::InProgress)
        .await
        .expect("create");
    workspace
        .lifecycle
        .set_agent_session(task.id(), Some(session))
        .await
        .expect("session attaches");
    workspace
        .ordering
        .move_task(MoveTaskRequest::new(
            task.id(),
            Column::NeedInput,
            Attribution::new(Actor::Agent),
        ))
        .await
        .expect("move should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn human_mention_resumes_the_waiting_agent() {
    let mut workspace = Workspace::open("RES", ResumeMode::Auto)
        .await
        .expect("workspace should open");
    let task = waiting_task(&workspace, AgentSession::new("codex", "thread-42")).await;

    let added = workspace
        .comments
        .add_comment(AddCommentRequest::new(
            task.id(),
            "@agent use the staging credentials",
            AuthorType::Human,
        ))
        .await
        .expect("comment stores");

    let outcome = added.resume.expect("trigger succeeds");
    assert!(outcome.is_resumed());
    let command = workspace.next_launch().await.expect("command launched");
    assert_eq!(command.program(), "codex");
    let leading: Vec<&str> = command.args().iter().take(3).map(String::as_str).collect();
    assert_eq!(leading, ["exec", "resume", "thread-42"]);
    assert_eq!(command.working_dir(), Utf8Path::new(WORK_DIR));
    let prompt = command.args().last().expect("prompt argument");
    assert!(prompt.contains("RES-1"));
    assert!(prompt.contains("use the staging credentials"));

    let stored = workspace
        .lifecycle
        .find_by_id(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored.column(), Column::InProgress);
    let entry = stored.history().last().expect("history entry");
    assert_eq!(entry.action(), HistoryAction::AutoResumed);
    assert_eq!(
        entry.metadata().get("trigger_comment"),
        Some(&serde_json::Value::String(added.comment.id().to_string()))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resumed_task_can_be_ordered_against_running_work() {
    let mut workspace = Workspace::open("RES", ResumeMode::Auto)
        .await
        .expect("workspace should open");
    let running = workspace
        .create("Already running", Column::InProgress)
        .await
        .expect("create");
    let task = waiting_task(&workspace, AgentSession::new("claude", "sess-1")).await;
    let newcomer = workspace.create("Newcomer", Column::Todo).await.expect("create");

    let added = workspace
        .comments
        .add_comment(AddCommentRequest::new(task.id(), "@agent go", AuthorType::Human))
        .await
        .expect("comment stores");
    assert!(added.resume.expect("trigger succeeds").is_resumed());
    workspace.next_launch().await.expect("command launched");

    let moved = workspace
        .ordering
        .move_task(
            MoveTaskRequest::new(newcomer.id(), Column::InProgress, Attribution::cli())
                .with_placement(Placement::Between {
                    before: running.id(),
                    after: task.id(),
                }),
        )
        .await
        .expect("move should succeed");

    let resumed = workspace
        .lifecycle
        .find_by_id(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert!(running.position() < moved.position());
    assert!(moved.position() < resumed.position());
}

#[rstest]
#[case(ResumeMode::Manual, AuthorType::Human, SkipReason::ResumeNotAutomatic)]
#[case(ResumeMode::Auto, AuthorType::Agent, SkipReason::NotHumanAuthor)]
#[tokio::test(flavor = "multi_thread")]
async fn skipped_comments_leave_the_task_waiting(
    #[case] mode: ResumeMode,
    #[case] author_type: AuthorType,
    #[case] reason: SkipReason,
) {
    let mut workspace = Workspace::open("RES", mode)
        .await
        .expect("workspace should open");
    let task = waiting_task(&workspace, AgentSession::new("claude", "sess-7")).await;

    let added = workspace
        .comments
        .add_comment(AddCommentRequest::new(task.id(), "@agent ping", author_type))
        .await
        .expect("comment stores");

    assert_eq!(added.resume.expect("trigger succeeds"), ResumeOutcome::Skipped(reason));
    assert!(workspace.nothing_launched());
    let stored = workspace
        .lifecycle
        .find_by_id(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored.column(), Column::NeedInput);
}
