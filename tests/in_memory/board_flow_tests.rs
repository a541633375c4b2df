//! In-memory integration tests for task creation, lookup and ordering.

use super::helpers::Workspace;
use tasklane::task::{
    domain::{Attribution, Column, HistoryAction, ResolveError, ResumeMode},
    services::{MoveTaskRequest, OrderingError, Placement, TaskLifecycleError},
};
use rstest::rstest;
use serde_json::json;

async fn workspace() -> Workspace {
    Workspace::open("KAN", ResumeMode::Manual)
        .await
        .expect("workspace should open")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn references_resolve_by_display_id_prefix_and_title() {
    let workspace = workspace().await;
    let login = workspace.create("Fix login redirect", Column::Todo).await.expect("create");
    let logout = workspace.create("Fix logout button", Column::Todo).await.expect("create");

    let by_display = workspace.lifecycle.resolve(None, "kan-2").await.expect("resolves");
    let id_text = login.id().to_string();
    let by_prefix = workspace
        .lifecycle
        .resolve(None, id_text.get(..8).expect("uuid has eight characters"))
        .await
        .expect("resolves");
    let by_title = workspace.lifecycle.resolve(None, "LOGIN").await.expect("resolves");
    let ambiguous = workspace.lifecycle.resolve(None, "fix").await;

    assert_eq!(by_display.id(), logout.id());
    assert_eq!(by_title.id(), login.id());
    assert_eq!(by_prefix.id(), login.id());
    assert!(matches!(
        ambiguous,
        Err(TaskLifecycleError::Resolve(ResolveError::Ambiguous { matches, .. }))
            if matches.len() == 2
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn display_id_lookup_ignores_prefix_case() {
    let workspace = workspace().await;
    let task = workspace.create("Tune alerts", Column::Backlog).await.expect("create");

    let found = workspace
        .lifecycle
        .find_by_display_id("kan-1")
        .await
        .expect("lookup should succeed");
    let missing = workspace
        .lifecycle
        .find_by_display_id("OPS-1")
        .await
        .expect("lookup should succeed");

    assert_eq!(found.map(|stored| stored.id()), Some(task.id()));
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_between_columns_records_history_and_order() {
    let workspace = workspace().await;
    let first = workspace.create("First", Column::InProgress).await.expect("create");
    let second = workspace.create("Second", Column::InProgress).await.expect("create");
    let mover = workspace.create("Mover", Column::Todo).await.expect("create");

    let moved = workspace
        .ordering
        .move_task(
            MoveTaskRequest::new(mover.id(), Column::InProgress, Attribution::cli())
                .with_placement(Placement::Between {
                    before: first.id(),
                    after: second.id(),
                }),
        )
        .await
        .expect("move should succeed");

    assert_eq!(moved.column(), Column::InProgress);
    assert!(moved.position() > first.position());
    assert!(moved.position() < second.position());
    let entry = moved.history().last().expect("history entry");
    assert_eq!(entry.action(), HistoryAction::Moved);
    let change = entry.change("column").expect("column change");
    assert_eq!(change.from, json!("todo"));
    assert_eq!(change.to, json!("in_progress"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn top_placement_sorts_ahead_of_the_column() {
    let workspace = workspace().await;
    let head = workspace.create("Head", Column::Todo).await.expect("create");
    let late = workspace.create("Late", Column::Todo).await.expect("create");

    let moved = workspace
        .ordering
        .move_task(
            MoveTaskRequest::new(late.id(), Column::Todo, Attribution::cli())
                .with_placement(Placement::Top),
        )
        .await
        .expect("move should succeed");

    assert!(moved.position() < head.position());
    assert_eq!(moved.history().len(), late.history().len());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rebalance_keeps_order_with_even_spacing() {
    let workspace = workspace().await;
    let mut titles = Vec::new();
    for title in ["One", "Two", "Three"] {
        workspace.create(title, Column::Review).await.expect("create");
        titles.push(title.to_owned());
    }

    let rebalanced = workspace
        .ordering
        .rebalance_column(workspace.board.id(), Column::Review)
        .await
        .expect("rebalance should succeed");

    let order: Vec<_> = rebalanced.iter().map(|task| task.title().to_owned()).collect();
    let positions: Vec<_> = rebalanced.iter().map(|task| task.position().value()).collect();
    assert_eq!(order, titles);
    assert_eq!(positions, vec![1000.0, 2000.0, 3000.0]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn neighbours_must_share_the_target_column() {
    let workspace = workspace().await;
    let outsider = workspace.create("Outsider", Column::Backlog).await.expect("create");
    let member = workspace.create("Member", Column::Todo).await.expect("create");
    let mover = workspace.create("Mover", Column::Backlog).await.expect("create");

    let result = workspace
        .ordering
        .move_task(
            MoveTaskRequest::new(mover.id(), Column::Todo, Attribution::cli())
                .with_placement(Placement::Between {
                    before: outsider.id(),
                    after: member.id(),
                }),
        )
        .await;

    assert!(matches!(
        result,
        Err(OrderingError::NotInColumn { task, column: Column::Todo }) if task == outsider.id()
    ));
}
