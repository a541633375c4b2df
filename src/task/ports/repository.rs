//! Repository port for task persistence and lookup.

use crate::task::domain::{BoardId, Column, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter for [`TaskRepository::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to one board.
    pub board: Option<BoardId>,
    /// Restrict to one column.
    pub column: Option<Column>,
}

impl TaskQuery {
    /// Matches every task.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            board: None,
            column: None,
        }
    }

    /// Matches tasks of one board.
    #[must_use]
    pub const fn in_board(board: BoardId) -> Self {
        Self {
            board: Some(board),
            column: None,
        }
    }

    /// Further restricts the query to one column.
    #[must_use]
    pub const fn in_column(mut self, column: Column) -> Self {
        self.column = Some(column);
        self
    }

    /// Returns `true` when `task` satisfies the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.board.is_none_or(|board| task.board() == board)
            && self.column.is_none_or(|column| task.column() == column)
    }
}

/// Task persistence contract.
///
/// Each call must be atomic for the single record it touches; services hold
/// no locks of their own.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching `query`, ordered by column, position and id.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A stored record could not be turned back into a task.
    #[error("corrupt task record {id}: {reason}")]
    CorruptRecord {
        /// Identifier of the unreadable record.
        id: TaskId,
        /// What was wrong with it.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
