//! Resume trigger: moves a task waiting on input back into progress when a
//! human mentions the agent, then relaunches the agent session.
//!
//! The checks run in a fixed order and stop at the first one that fails.
//! A failed condition is a normal outcome ([`ResumeOutcome::Skipped`]); only
//! lookups, malformed sessions and persistence produce errors. The task is
//! committed to `in_progress` before the agent command is launched on a
//! detached tokio task whose result is only logged.

use super::prompt::render_resume_prompt;
use crate::config::OrchestrationConfig;
use crate::task::{
    domain::{
        AuthorType, BoardId, Column, Comment, Position, ResumeBuildError, ResumeCommand,
        ResumeMode, ResumePayload, Task, TaskDomainError, TaskId,
    },
    ports::{
        BoardRepository, BoardRepositoryError, CommentRepository, CommentRepositoryError,
        ProcessExecutor, TaskQuery, TaskRepository, TaskRepositoryError,
    },
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a comment did not resume its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The comment was written by an agent.
    NotHumanAuthor,
    /// The comment does not mention the agent.
    AgentNotMentioned,
    /// The task is not waiting for input.
    NotAwaitingInput,
    /// The task has no agent session to resume.
    NoAgentSession,
    /// The board does not resume automatically.
    ResumeNotAutomatic,
}

impl SkipReason {
    /// Returns the snake-case label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotHumanAuthor => "not_human_author",
            Self::AgentNotMentioned => "agent_not_mentioned",
            Self::NotAwaitingInput => "not_awaiting_input",
            Self::NoAgentSession => "no_agent_session",
            Self::ResumeNotAutomatic => "resume_not_automatic",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a comment.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    /// A condition did not hold; nothing changed.
    Skipped(SkipReason),
    /// The task moved to `in_progress` and the command was launched.
    Resumed {
        /// Task after the transition was persisted.
        task: Box<Task>,
        /// Command handed to the process executor.
        command: ResumeCommand,
    },
}

impl ResumeOutcome {
    /// Returns `true` when the task was resumed.
    #[must_use]
    pub const fn is_resumed(&self) -> bool {
        matches!(self, Self::Resumed { .. })
    }
}

/// A record the trigger needed but could not load.
#[derive(Debug, Error)]
pub enum LookupFailure {
    /// The commented task does not exist.
    #[error("task {0} not found")]
    TaskMissing(TaskId),
    /// The task's board does not exist.
    #[error("board {0} not found")]
    BoardMissing(BoardId),
    /// Loading the task failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Loading the board failed.
    #[error(transparent)]
    Board(#[from] BoardRepositoryError),
    /// Loading the task's comments failed.
    #[error(transparent)]
    Comments(#[from] CommentRepositoryError),
}

/// Errors returned by the resume trigger.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// A record could not be loaded.
    #[error("resume lookup failed: {0}")]
    LookupFailed(#[from] LookupFailure),
    /// The stored agent session lacks a tool or reference.
    #[error("invalid agent session: {0}")]
    InvalidSession(String),
    /// No resume command is known for the session's tool.
    #[error("unsupported agent tool: {0}")]
    UnsupportedTool(String),
    /// The context prompt could not be rendered.
    #[error("failed to render resume prompt: {0}")]
    PromptRender(String),
    /// The transition could not be applied.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Persisting the transition failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<ResumeBuildError> for ResumeError {
    fn from(err: ResumeBuildError) -> Self {
        match err {
            ResumeBuildError::InvalidSession(reason) => Self::InvalidSession(reason),
            ResumeBuildError::UnsupportedTool(tool) => Self::UnsupportedTool(tool),
        }
    }
}

/// Result type for resume trigger operations.
pub type ResumeResult<T> = Result<T, ResumeError>;

/// Evaluates new comments and resumes agent sessions.
#[derive(Clone)]
pub struct ResumeTriggerService<R, B, M, P, C>
where
    R: TaskRepository,
    B: BoardRepository,
    M: CommentRepository,
    P: ProcessExecutor + 'static,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    boards: Arc<B>,
    comments: Arc<M>,
    executor: Arc<P>,
    clock: Arc<C>,
    config: OrchestrationConfig,
}

impl<R, B, M, P, C> ResumeTriggerService<R, B, M, P, C>
where
    R: TaskRepository,
    B: BoardRepository,
    M: CommentRepository,
    P: ProcessExecutor + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new resume trigger.
    #[must_use]
    pub const fn new(
        tasks: Arc<R>,
        boards: Arc<B>,
        comments: Arc<M>,
        executor: Arc<P>,
        clock: Arc<C>,
        config: OrchestrationConfig,
    ) -> Self {
        Self {
            tasks,
            boards,
            comments,
            executor,
            clock,
            config,
        }
    }

    /// Evaluates a freshly stored comment and resumes its task when every
    /// condition holds.
    ///
    /// Must be called once per comment. The command is launched in the
    /// background after the transition is persisted; a launch failure is
    /// logged and never rolls the task back.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeError`] when a lookup fails, the session cannot be
    /// turned into a command, or the transition cannot be persisted.
    pub async fn check_and_resume(&self, comment: &Comment) -> ResumeResult<ResumeOutcome> {
        if comment.author_type() != AuthorType::Human {
            return Ok(skip(comment, SkipReason::NotHumanAuthor));
        }
        if !comment.mentions_token(&self.config.agent_mention) {
            return Ok(skip(comment, SkipReason::AgentNotMentioned));
        }

        let mut task = self
            .tasks
            .find_by_id(comment.task())
            .await
            .map_err(LookupFailure::from)?
            .ok_or(LookupFailure::TaskMissing(comment.task()))?;
        if task.column() != Column::NeedInput {
            return Ok(skip(comment, SkipReason::NotAwaitingInput));
        }
        let Some(session) = task.agent_session().cloned() else {
            return Ok(skip(comment, SkipReason::NoAgentSession));
        };

        let board = self
            .boards
            .find_by_id(task.board())
            .await
            .map_err(LookupFailure::from)?
            .ok_or(LookupFailure::BoardMissing(task.board()))?;
        if board.resume_mode() != ResumeMode::Auto {
            return Ok(skip(comment, SkipReason::ResumeNotAutomatic));
        }

        let payload = ResumePayload::from_session(&session, &self.config.resolve_working_dir())?;
        let recent = self
            .comments
            .list_for_task(task.id(), Some(self.config.resume_comment_limit))
            .await
            .map_err(LookupFailure::from)?;
        let prompt = render_resume_prompt(&task, board.prefix(), &recent)
            .map_err(ResumeError::PromptRender)?;
        let command = ResumeCommand::build(&payload, &prompt)?;

        let position = self.bottom_of_in_progress(task.board()).await?;
        task.resume_from_input(comment.id(), position, &*self.clock)?;
        self.tasks
            .update(&task)
            .await
            .map_err(ResumeError::Repository)?;
        info!(
            task_id = %task.id(),
            comment_id = %comment.id(),
            command = %command,
            "task resumed from need_input"
        );

        self.launch(task.id(), command.clone());
        Ok(ResumeOutcome::Resumed {
            task: Box::new(task),
            command,
        })
    }

    async fn bottom_of_in_progress(&self, board: BoardId) -> ResumeResult<Position> {
        let siblings = self
            .tasks
            .list(&TaskQuery::in_board(board).in_column(Column::InProgress))
            .await
            .map_err(LookupFailure::from)?;
        let max = siblings.iter().map(Task::position).max();
        Ok(Position::next_after(max, self.config.position_stride))
    }

    fn launch(&self, task_id: TaskId, command: ResumeCommand) {
        let executor = Arc::clone(&self.executor);
        tokio::spawn(async move {
            match executor.run(&command).await {
                Ok(exit) if exit.success() => {
                    info!(
                        task_id = %task_id,
                        status = "succeeded",
                        "agent resume command finished"
                    );
                }
                Ok(exit) => {
                    warn!(
                        task_id = %task_id,
                        status = "failed",
                        exit_code = ?exit.code(),
                        "agent resume command exited unsuccessfully"
                    );
                }
                Err(error) => {
                    warn!(
                        task_id = %task_id,
                        status = "failed",
                        error = %error,
                        "agent resume command could not run"
                    );
                }
            }
        });
    }
}

fn skip(comment: &Comment, reason: SkipReason) -> ResumeOutcome {
    debug!(
        task_id = %comment.task(),
        comment_id = %comment.id(),
        reason = %reason,
        "resume trigger skipped"
    );
    ResumeOutcome::Skipped(reason)
}
