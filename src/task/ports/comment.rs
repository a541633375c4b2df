//! Repository port for task comments.

use crate::task::domain::{Comment, CommentId, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for comment repository operations.
pub type CommentRepositoryResult<T> = Result<T, CommentRepositoryError>;

/// Comment persistence contract. Comments are immutable once stored.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`CommentRepositoryError::DuplicateComment`] when the comment
    /// ID already exists.
    async fn store(&self, comment: &Comment) -> CommentRepositoryResult<()>;

    /// Finds a comment by identifier.
    async fn find_by_id(&self, id: CommentId) -> CommentRepositoryResult<Option<Comment>>;

    /// Lists comments on `task` in creation order.
    ///
    /// With a `limit`, only the most recent `limit` comments are returned,
    /// still oldest first.
    async fn list_for_task(
        &self,
        task: TaskId,
        limit: Option<usize>,
    ) -> CommentRepositoryResult<Vec<Comment>>;
}

/// Errors returned by comment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CommentRepositoryError {
    /// A comment with the same identifier already exists.
    #[error("duplicate comment identifier: {0}")]
    DuplicateComment(CommentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CommentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
