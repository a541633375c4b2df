//! Service layer for task creation, updates and reference resolution.

use crate::config::OrchestrationConfig;
use crate::task::{
    domain::{
        AgentSession, Attribution, BoardId, Column, DisplayId, NewTaskData, Position, Priority,
        ResolveError, Task, TaskDomainError, TaskId, TaskUpdate, resolve_reference,
    },
    ports::{
        BoardRepository, BoardRepositoryError, TaskQuery, TaskRepository, TaskRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    board: BoardId,
    title: String,
    description: Option<String>,
    column: Column,
    priority: Priority,
    created_by: Attribution,
}

impl CreateTaskRequest {
    /// Creates a request for a medium-priority backlog task.
    #[must_use]
    pub fn new(board: BoardId, title: impl Into<String>, created_by: Attribution) -> Self {
        Self {
            board,
            title: title.into(),
            description: None,
            column: Column::Backlog,
            priority: Priority::default(),
            created_by,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial column.
    #[must_use]
    pub const fn in_column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Board repository operation failed.
    #[error(transparent)]
    BoardRepository(#[from] BoardRepositoryError),
    /// A reference did not resolve to exactly one task.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No board exists with the given identifier.
    #[error("board {0} not found")]
    BoardNotFound(BoardId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, B, C>
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

impl<R, B, C> TaskLifecycleService<R, B, C>
where
    R: TaskRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
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

    /// Creates a task at the bottom of its initial column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the board is missing, does not
    /// define the column, the title is blank, or persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let board = self
            .boards
            .find_by_id(request.board)
            .await?
            .ok_or(TaskLifecycleError::BoardNotFound(request.board))?;
        board.ensure_column(request.column)?;

        let siblings = self
            .tasks
            .list(&TaskQuery::in_board(board.id()).in_column(request.column))
            .await?;
        let last = siblings.iter().map(Task::position).max();
        let position = Position::next_after(last, self.config.position_stride);
        let sequence = self.boards.allocate_sequence(board.id()).await?;

        let task = Task::new(
            NewTaskData {
                board: board.id(),
                sequence,
                title: request.title,
                description: request.description,
                column: request.column,
                priority: request.priority,
                position,
                created_by: request.created_by,
            },
            &*self.clock,
        )?;
        self.tasks.store(&task).await?;
        debug!(task_id = %task.id(), display_id = %task.display_id(board.prefix()), "task created");
        Ok(task)
    }

    /// Changes title, description or priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks,
    /// domain errors for blank titles, or persistence errors.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        update: TaskUpdate,
        by: &Attribution,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        if task.apply_update(update, by, &*self.clock)? {
            self.tasks.update(&task).await?;
        }
        Ok(task)
    }

    /// Attaches or clears the agent session of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks or
    /// persistence errors.
    pub async fn set_agent_session(
        &self,
        task_id: TaskId,
        session: Option<AgentSession>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.set_agent_session(session, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.tasks.find_by_id(task_id).await?)
    }

    /// Retrieves a task by its `PREFIX-N` display identifier.
    ///
    /// Prefixes compare case-insensitively. Returns `None` when no board
    /// uses the prefix or the board has no task with that sequence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for malformed display ids or
    /// repository errors.
    pub async fn find_by_display_id(&self, display_id: &str) -> TaskLifecycleResult<Option<Task>> {
        let parsed = DisplayId::parse(display_id)?;
        let boards = self.boards.list().await?;
        let Some(board) = boards
            .iter()
            .find(|board| board.prefix() == parsed.prefix())
        else {
            return Ok(None);
        };
        let tasks = self.tasks.list(&TaskQuery::in_board(board.id())).await?;
        Ok(tasks
            .into_iter()
            .find(|task| task.sequence() == parsed.sequence()))
    }

    /// Resolves a free-form reference to one task, optionally within a
    /// single board.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Resolve`] when the reference matches no
    /// task or several, or repository errors.
    pub async fn resolve(
        &self,
        board: Option<BoardId>,
        candidate: &str,
    ) -> TaskLifecycleResult<Task> {
        let query = board.map_or_else(TaskQuery::all, TaskQuery::in_board);
        let tasks = self.tasks.list(&query).await?;
        let boards = self.boards.list().await?;
        let resolved = resolve_reference(candidate, &tasks, &boards)?;
        Ok(resolved.clone())
    }

    async fn find_task_or_error(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }
}
