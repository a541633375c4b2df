//! Blocking dependencies, readiness queries and work suggestions.

use crate::task::{
    domain::{
        Attribution, BoardId, Column, DependencyGraph, GraphError, Suggestion, Task,
        TaskDomainError, TaskId,
    },
    ports::{TaskQuery, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors returned by the dependency service.
#[derive(Debug, Error)]
pub enum DependencyError {
    /// A task was asked to block itself.
    #[error("task {0} cannot block itself")]
    SelfBlock(TaskId),
    /// A task or blocker id does not name a stored task.
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),
    /// The edge would close a cycle.
    #[error("task {blocker} already depends on {task}; blocking {task} on it would create a cycle")]
    CycleDetected {
        /// Task that would be blocked.
        task: TaskId,
        /// Proposed blocker.
        blocker: TaskId,
    },
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl From<GraphError> for DependencyError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::SelfBlock(task) => Self::SelfBlock(task),
            GraphError::UnknownTask(task) => Self::UnknownTask(task),
            GraphError::CycleDetected { task, blocker } => Self::CycleDetected { task, blocker },
        }
    }
}

/// Result type for dependency service operations.
pub type DependencyResult<T> = Result<T, DependencyError>;

/// Blocking state a listing is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockFilter {
    /// Every task.
    #[default]
    Any,
    /// Actionable tasks with no unfinished blocker.
    Ready,
    /// Tasks with at least one unfinished blocker.
    Blocked,
    /// Tasks with no unfinished blocker, in any column.
    NotBlocked,
}

/// Filter for [`DependencyService::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Restrict to one board.
    pub board: Option<BoardId>,
    /// Restrict to one column.
    pub column: Option<Column>,
    /// Restrict by blocking state.
    pub state: BlockFilter,
}

impl ListFilter {
    /// Restricts the listing to `board`.
    #[must_use]
    pub const fn in_board(mut self, board: BoardId) -> Self {
        self.board = Some(board);
        self
    }

    /// Restricts the listing to `column`.
    #[must_use]
    pub const fn in_column(mut self, column: Column) -> Self {
        self.column = Some(column);
        self
    }

    /// Restricts the listing by blocking state.
    #[must_use]
    pub const fn with_state(mut self, state: BlockFilter) -> Self {
        self.state = state;
        self
    }
}

/// A ranked suggestion paired with its task.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTask {
    /// Suggested task.
    pub task: Task,
    /// Ranking details.
    pub suggestion: Suggestion,
}

/// Manages `blocked_by` edges between tasks.
///
/// Every call works on one repository listing, so validation and queries
/// see a single consistent graph.
#[derive(Clone)]
pub struct DependencyService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> DependencyService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new dependency service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, clock: Arc<C>) -> Self {
        Self { tasks, clock }
    }

    /// Records that `task` is blocked by `blocker`.
    ///
    /// Adding an edge that already exists changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::SelfBlock`], [`DependencyError::UnknownTask`]
    /// or [`DependencyError::CycleDetected`] when the edge is invalid, or
    /// repository errors.
    pub async fn add_block(
        &self,
        task_id: TaskId,
        blocker: TaskId,
        by: &Attribution,
    ) -> DependencyResult<Task> {
        let snapshot = self.snapshot().await?;
        let graph = DependencyGraph::from_tasks(&snapshot);
        graph.validate_edge(task_id, blocker)?;

        let mut task = take_task(snapshot, task_id)?;
        if task.add_blocker(blocker, by, &*self.clock)? {
            self.tasks.update(&task).await?;
            debug!(task_id = %task_id, blocker = %blocker, "blocker added");
        }
        Ok(task)
    }

    /// Removes the edge `task -> blocker`. Missing edges are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::UnknownTask`] when `task` does not exist,
    /// or repository errors.
    pub async fn remove_block(
        &self,
        task_id: TaskId,
        blocker: TaskId,
        by: &Attribution,
    ) -> DependencyResult<Task> {
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DependencyError::UnknownTask(task_id))?;
        if task.remove_blocker(blocker, by, &*self.clock) {
            self.tasks.update(&task).await?;
            debug!(task_id = %task_id, blocker = %blocker, "blocker removed");
        }
        Ok(task)
    }

    /// Replaces every blocker of `task`.
    ///
    /// Each new edge is validated against the graph without the task's old
    /// edges; one `updated` history entry records the change.
    ///
    /// # Errors
    ///
    /// Returns the same edge errors as [`DependencyService::add_block`], or
    /// repository errors. Nothing is stored when any edge is rejected.
    pub async fn set_blocked_by(
        &self,
        task_id: TaskId,
        blockers: BTreeSet<TaskId>,
        by: &Attribution,
    ) -> DependencyResult<Task> {
        let snapshot = self.snapshot().await?;
        let mut graph = DependencyGraph::from_tasks(&snapshot);
        if !graph.contains(task_id) {
            return Err(DependencyError::UnknownTask(task_id));
        }
        graph.clear_edges(task_id);
        for blocker in &blockers {
            graph.validate_edge(task_id, *blocker)?;
            graph.insert_edge(task_id, *blocker);
        }

        let mut task = take_task(snapshot, task_id)?;
        if task.replace_blockers(blockers, by, &*self.clock)? {
            self.tasks.update(&task).await?;
            debug!(task_id = %task_id, "blockers replaced");
        }
        Ok(task)
    }

    /// Returns `true` when any blocker of `task` is unfinished.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::UnknownTask`] or repository errors.
    pub async fn is_blocked(&self, task_id: TaskId) -> DependencyResult<bool> {
        let graph = self.graph_containing(task_id).await?;
        Ok(graph.is_blocked(task_id))
    }

    /// Returns `true` when `task` is actionable and unblocked.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::UnknownTask`] or repository errors.
    pub async fn is_ready(&self, task_id: TaskId) -> DependencyResult<bool> {
        let graph = self.graph_containing(task_id).await?;
        Ok(graph.is_ready(task_id))
    }

    /// Counts the tasks that finishing `task` would unblock.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::UnknownTask`] or repository errors.
    pub async fn unblock_impact(&self, task_id: TaskId) -> DependencyResult<usize> {
        let graph = self.graph_containing(task_id).await?;
        Ok(graph.unblock_impact(task_id))
    }

    /// Lists tasks matching `filter` in column and position order.
    ///
    /// Blocking state is evaluated against every stored task, so blockers on
    /// other boards count.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Repository`] when listing fails.
    pub async fn list(&self, filter: ListFilter) -> DependencyResult<Vec<Task>> {
        let snapshot = self.snapshot().await?;
        let graph = DependencyGraph::from_tasks(&snapshot);
        let query = TaskQuery {
            board: filter.board,
            column: filter.column,
        };
        Ok(snapshot
            .into_iter()
            .filter(|task| query.matches(task))
            .filter(|task| match filter.state {
                BlockFilter::Any => true,
                BlockFilter::Ready => graph.is_ready(task.id()),
                BlockFilter::Blocked => graph.is_blocked(task.id()),
                BlockFilter::NotBlocked => !graph.is_blocked(task.id()),
            })
            .collect())
    }

    /// Ranks what to work on next, best first.
    ///
    /// In-progress tasks lead, followed by urgent, high and remaining ready
    /// tasks; within a tier higher unblock impact wins. `limit` caps the
    /// number of suggestions.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Repository`] when listing fails.
    pub async fn suggest(
        &self,
        board: Option<BoardId>,
        limit: Option<usize>,
    ) -> DependencyResult<Vec<RankedTask>> {
        let snapshot = self.snapshot().await?;
        let graph = DependencyGraph::from_tasks(&snapshot);
        let ranked = graph
            .rank_suggestions()
            .into_iter()
            .filter_map(|suggestion| {
                snapshot
                    .iter()
                    .find(|task| task.id() == suggestion.task)
                    .filter(|task| board.is_none_or(|wanted| task.board() == wanted))
                    .map(|task| RankedTask {
                        task: task.clone(),
                        suggestion,
                    })
            })
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(ranked)
    }

    async fn snapshot(&self) -> DependencyResult<Vec<Task>> {
        Ok(self.tasks.list(&TaskQuery::all()).await?)
    }

    async fn graph_containing(&self, task_id: TaskId) -> DependencyResult<DependencyGraph> {
        let graph = DependencyGraph::from_tasks(&self.snapshot().await?);
        if graph.contains(task_id) {
            Ok(graph)
        } else {
            Err(DependencyError::UnknownTask(task_id))
        }
    }
}

fn take_task(snapshot: Vec<Task>, task_id: TaskId) -> DependencyResult<Task> {
    snapshot
        .into_iter()
        .find(|task| task.id() == task_id)
        .ok_or(DependencyError::UnknownTask(task_id))
}
