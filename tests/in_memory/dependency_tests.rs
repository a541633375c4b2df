//! In-memory integration tests for blocking dependencies and suggestions.

use std::collections::BTreeSet;

use super::helpers::Workspace;
use tasklane::task::{
    domain::{Attribution, Column, ResumeMode, SuggestionTier},
    services::{BlockFilter, DependencyError, ListFilter, MoveTaskRequest},
};
use rstest::rstest;

async fn workspace() -> Workspace {
    Workspace::open("DEP", ResumeMode::Manual)
        .await
        .expect("workspace should open")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finishing_a_blocker_frees_its_dependents() {
    let workspace = workspace().await;
    let schema = workspace.create("Design schema", Column::Todo).await.expect("create");
    let api = workspace.create("Build API", Column::Todo).await.expect("create");
    let by = Attribution::cli();

    workspace
        .dependencies
        .add_block(api.id(), schema.id(), &by)
        .await
        .expect("block should succeed");
    assert!(workspace.dependencies.is_blocked(api.id()).await.expect("query"));
    assert_eq!(
        workspace.dependencies.unblock_impact(schema.id()).await.expect("query"),
        1
    );

    workspace
        .ordering
        .move_task(MoveTaskRequest::new(schema.id(), Column::Done, by))
        .await
        .expect("move should succeed");

    assert!(!workspace.dependencies.is_blocked(api.id()).await.expect("query"));
    assert!(workspace.dependencies.is_ready(api.id()).await.expect("query"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cycles_are_rejected_without_changing_either_task() {
    let workspace = workspace().await;
    let first = workspace.create("First", Column::Todo).await.expect("create");
    let second = workspace.create("Second", Column::Todo).await.expect("create");
    let third = workspace.create("Third", Column::Todo).await.expect("create");
    let by = Attribution::cli();
    workspace
        .dependencies
        .add_block(second.id(), first.id(), &by)
        .await
        .expect("block should succeed");
    workspace
        .dependencies
        .add_block(third.id(), second.id(), &by)
        .await
        .expect("block should succeed");

    let result = workspace.dependencies.add_block(first.id(), third.id(), &by).await;

    assert!(matches!(result, Err(DependencyError::CycleDetected { .. })));
    let stored = workspace
        .lifecycle
        .find_by_id(first.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert!(stored.blocked_by().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_blockers_updates_list_filters() {
    let workspace = workspace().await;
    let old = workspace.create("Old blocker", Column::Todo).await.expect("create");
    let new = workspace.create("New blocker", Column::InProgress).await.expect("create");
    let target = workspace.create("Target", Column::Todo).await.expect("create");
    let by = Attribution::cli();
    workspace
        .dependencies
        .add_block(target.id(), old.id(), &by)
        .await
        .expect("block should succeed");

    let updated = workspace
        .dependencies
        .set_blocked_by(target.id(), BTreeSet::from([new.id()]), &by)
        .await
        .expect("replace should succeed");

    assert_eq!(updated.blocked_by(), &BTreeSet::from([new.id()]));
    let blocked = workspace
        .dependencies
        .list(ListFilter::default().with_state(BlockFilter::Blocked))
        .await
        .expect("list");
    let ready = workspace
        .dependencies
        .list(
            ListFilter::default()
                .in_board(workspace.board.id())
                .in_column(Column::Todo)
                .with_state(BlockFilter::Ready),
        )
        .await
        .expect("list");
    assert_eq!(
        blocked.iter().map(|task| task.id()).collect::<Vec<_>>(),
        vec![target.id()]
    );
    assert_eq!(
        ready.iter().map(|task| task.id()).collect::<Vec<_>>(),
        vec![old.id()]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suggestions_put_active_work_first() {
    let workspace = workspace().await;
    let active = workspace.create("Active", Column::InProgress).await.expect("create");
    let waiting = workspace.create("Waiting", Column::Todo).await.expect("create");
    let gate = workspace.create("Gate", Column::Todo).await.expect("create");
    workspace
        .dependencies
        .add_block(waiting.id(), gate.id(), &Attribution::cli())
        .await
        .expect("block should succeed");

    let ranked = workspace
        .dependencies
        .suggest(Some(workspace.board.id()), Some(5))
        .await
        .expect("suggest");

    let order: Vec<_> = ranked.iter().map(|entry| entry.task.id()).collect();
    assert_eq!(order, vec![active.id(), gate.id()]);
    let first = ranked.first().expect("suggestion");
    assert_eq!(first.suggestion.tier, SuggestionTier::InProgress);
    let second = ranked.get(1).expect("suggestion");
    assert_eq!(second.suggestion.unblock_impact, 1);
}
