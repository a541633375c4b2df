//! Comment creation with the resume hook.

use super::resume::{ResumeOutcome, ResumeResult, ResumeTriggerService};
use crate::task::{
    domain::{AuthorType, Comment, TaskId},
    ports::{
        BoardRepository, CommentRepository, CommentRepositoryError, ProcessExecutor,
        TaskRepository, TaskRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Request payload for adding a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommentRequest {
    /// Commented task.
    pub task: TaskId,
    /// Free-text body.
    pub content: String,
    /// Who wrote it.
    pub author_type: AuthorType,
}

impl AddCommentRequest {
    /// Creates a comment request.
    #[must_use]
    pub fn new(task: TaskId, content: impl Into<String>, author_type: AuthorType) -> Self {
        Self {
            task,
            content: content.into(),
            author_type,
        }
    }
}

/// A stored comment together with what the resume trigger did with it.
#[derive(Debug)]
pub struct CommentAdded {
    /// The persisted comment.
    pub comment: Comment,
    /// Outcome of the resume check. An error here never undoes the comment.
    pub resume: ResumeResult<ResumeOutcome>,
}

/// Errors returned while storing a comment.
#[derive(Debug, Error)]
pub enum CommentServiceError {
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// Task lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// Comment persistence failed.
    #[error(transparent)]
    Repository(#[from] CommentRepositoryError),
}

/// Stores comments and runs the resume trigger for each one.
#[derive(Clone)]
pub struct CommentService<R, B, M, P, C>
where
    R: TaskRepository,
    B: BoardRepository,
    M: CommentRepository,
    P: ProcessExecutor + 'static,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    comments: Arc<M>,
    trigger: Arc<ResumeTriggerService<R, B, M, P, C>>,
    clock: Arc<C>,
}

impl<R, B, M, P, C> CommentService<R, B, M, P, C>
where
    R: TaskRepository,
    B: BoardRepository,
    M: CommentRepository,
    P: ProcessExecutor + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new comment service.
    #[must_use]
    pub const fn new(
        tasks: Arc<R>,
        comments: Arc<M>,
        trigger: Arc<ResumeTriggerService<R, B, M, P, C>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            comments,
            trigger,
            clock,
        }
    }

    /// Stores a comment, extracting its mentions, then evaluates it with
    /// the resume trigger.
    ///
    /// # Errors
    ///
    /// Returns [`CommentServiceError`] when the task does not exist or the
    /// comment cannot be stored. Trigger failures are logged and reported
    /// in [`CommentAdded::resume`] instead.
    pub async fn add_comment(
        &self,
        request: AddCommentRequest,
    ) -> Result<CommentAdded, CommentServiceError> {
        if self.tasks.find_by_id(request.task).await?.is_none() {
            return Err(CommentServiceError::TaskNotFound(request.task));
        }
        let comment = Comment::new(
            request.task,
            request.content,
            request.author_type,
            &*self.clock,
        );
        self.comments.store(&comment).await?;

        let resume = self.trigger.check_and_resume(&comment).await;
        if let Err(err) = &resume {
            error!(
                task_id = %comment.task(),
                comment_id = %comment.id(),
                error = %err,
                "resume trigger failed"
            );
        }
        Ok(CommentAdded { comment, resume })
    }
}
