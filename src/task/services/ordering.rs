//! Column placement and fractional reordering of tasks.

use crate::config::OrchestrationConfig;
use crate::task::{
    domain::{Attribution, BoardId, Column, Position, Task, TaskDomainError, TaskId},
    ports::{
        BoardRepository, BoardRepositoryError, TaskQuery, TaskRepository, TaskRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Where a moved task lands inside its target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Ahead of every other task in the column.
    Top,
    /// After every other task in the column.
    Bottom,
    /// Between two neighbours already in the target column.
    Between {
        /// Task that should sort immediately before the moved one.
        before: TaskId,
        /// Task that should sort immediately after the moved one.
        after: TaskId,
    },
}

/// Request payload for moving a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskRequest {
    /// Task to move.
    pub task: TaskId,
    /// Target column; may equal the current one to reorder in place.
    pub column: Column,
    /// Placement inside the target column.
    pub placement: Placement,
    /// Who requested the move.
    pub by: Attribution,
}

impl MoveTaskRequest {
    /// Creates a request that moves `task` to the bottom of `column`.
    #[must_use]
    pub const fn new(task: TaskId, column: Column, by: Attribution) -> Self {
        Self {
            task,
            column,
            placement: Placement::Bottom,
            by,
        }
    }

    /// Sets the placement.
    #[must_use]
    pub const fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// Errors returned by the ordering service.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Board repository operation failed.
    #[error(transparent)]
    BoardRepository(#[from] BoardRepositoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No board exists with the given identifier.
    #[error("board {0} not found")]
    BoardNotFound(BoardId),
    /// A placement neighbour is not in the target column.
    #[error("task {task} is not in column {column}")]
    NotInColumn {
        /// Neighbour named by the placement.
        task: TaskId,
        /// Target column.
        column: Column,
    },
    /// The `before` neighbour does not sort ahead of the `after` neighbour.
    #[error("task {before} does not sort before task {after}")]
    InvalidBounds {
        /// Requested predecessor.
        before: TaskId,
        /// Requested successor.
        after: TaskId,
    },
}

/// Result type for ordering service operations.
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Moves and reorders tasks within board columns.
#[derive(Clone)]
pub struct OrderingService<R, B, C>
where
    R: TaskRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    boards: Arc<B>,
    clock: Arc<C>,
    config: OrchestrationConfig,
}

impl<R, B, C> OrderingService<R, B, C>
where
    R: TaskRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new ordering service.
    #[must_use]
    pub const fn new(
        tasks: Arc<R>,
        boards: Arc<B>,
        clock: Arc<C>,
        config: OrchestrationConfig,
    ) -> Self {
        Self {
            tasks,
            boards,
            clock,
            config,
        }
    }

    /// Moves a task to a column and placement.
    ///
    /// A column change records a `moved` history entry; reordering within
    /// the same column does not. When bisection between two neighbours
    /// cannot produce a distinct key, the column is rebalanced first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError`] when the task, its board or a neighbour is
    /// missing, the board lacks the column, the neighbours are out of order,
    /// or persistence fails.
    pub async fn move_task(&self, request: MoveTaskRequest) -> OrderingResult<Task> {
        let mut task = self
            .tasks
            .find_by_id(request.task)
            .await?
            .ok_or(OrderingError::TaskNotFound(request.task))?;
        let board = self
            .boards
            .find_by_id(task.board())
            .await?
            .ok_or(OrderingError::BoardNotFound(task.board()))?;
        board.ensure_column(request.column)?;

        let mut siblings = self.siblings(task.board(), request.column, task.id()).await?;
        let stride = self.config.position_stride;
        let position = match request.placement {
            Placement::Top => {
                Position::before_first(siblings.first().map(Task::position), stride)
            }
            Placement::Bottom => {
                Position::next_after(siblings.last().map(Task::position), stride)
            }
            Placement::Between { before, after } => {
                self.position_between(&mut siblings, request.column, before, after)
                    .await?
            }
        };

        task.move_to(request.column, position, &request.by, &*self.clock);
        self.tasks.update(&task).await?;
        debug!(
            task_id = %task.id(),
            column = %task.column(),
            position = %task.position(),
            "task moved"
        );
        Ok(task)
    }

    /// Reassigns evenly spaced positions to a column, keeping its order.
    ///
    /// Returns the column's tasks in their new order. No history is
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::Repository`] when listing or persisting
    /// fails.
    pub async fn rebalance_column(
        &self,
        board: BoardId,
        column: Column,
    ) -> OrderingResult<Vec<Task>> {
        let mut tasks = self
            .tasks
            .list(&TaskQuery::in_board(board).in_column(column))
            .await?;
        self.rebalance(&mut tasks).await?;
        info!(board_id = %board, column = %column, count = tasks.len(), "column rebalanced");
        Ok(tasks)
    }

    async fn siblings(
        &self,
        board: BoardId,
        column: Column,
        moving: TaskId,
    ) -> OrderingResult<Vec<Task>> {
        let mut tasks = self
            .tasks
            .list(&TaskQuery::in_board(board).in_column(column))
            .await?;
        tasks.retain(|task| task.id() != moving);
        Ok(tasks)
    }

    async fn position_between(
        &self,
        siblings: &mut [Task],
        column: Column,
        before: TaskId,
        after: TaskId,
    ) -> OrderingResult<Position> {
        let (lower, upper) = bounds(siblings, column, before, after)?;
        let candidate = Position::between(lower, upper);
        if !candidate.is_degenerate_between(lower, upper) {
            return Ok(candidate);
        }

        debug!(before = %before, after = %after, "positions exhausted, rebalancing column");
        if lower == upper {
            order_tied(siblings, before, after);
        }
        self.rebalance(siblings).await?;
        let (spread_lower, spread_upper) = bounds(siblings, column, before, after)?;
        Ok(Position::between(spread_lower, spread_upper))
    }

    async fn rebalance(&self, tasks: &mut [Task]) -> OrderingResult<()> {
        let positions = Position::rebalanced(tasks.len(), self.config.position_stride);
        for (task, position) in tasks.iter_mut().zip(positions) {
            task.reposition(position);
            self.tasks.update(task).await?;
        }
        Ok(())
    }
}

fn bounds(
    siblings: &[Task],
    column: Column,
    before: TaskId,
    after: TaskId,
) -> OrderingResult<(Position, Position)> {
    let position_of = |id: TaskId| {
        siblings
            .iter()
            .find(|task| task.id() == id)
            .map(Task::position)
            .ok_or(OrderingError::NotInColumn { task: id, column })
    };
    let lower = position_of(before)?;
    let upper = position_of(after)?;
    if before == after || lower > upper {
        return Err(OrderingError::InvalidBounds { before, after });
    }
    Ok((lower, upper))
}

/// Puts `before` ahead of `after` when the two share a key, so a rebalance
/// spreads them in the requested order. Every task between them shares the
/// key too, so the swap keeps the slice sorted.
fn order_tied(siblings: &mut [Task], before: TaskId, after: TaskId) {
    let index_of = |id: TaskId| siblings.iter().position(|task| task.id() == id);
    if let (Some(lower), Some(upper)) = (index_of(before), index_of(after)) {
        if upper < lower {
            siblings.swap(upper, lower);
        }
    }
}
