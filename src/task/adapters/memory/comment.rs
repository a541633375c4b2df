//! In-memory comment repository.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Comment, CommentId, TaskId},
    ports::{CommentRepository, CommentRepositoryError, CommentRepositoryResult},
};

/// Thread-safe in-memory comment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentRepository {
    state: Arc<RwLock<InMemoryCommentState>>,
}

#[derive(Debug, Default)]
struct InMemoryCommentState {
    ids: HashSet<CommentId>,
    // Insertion order per task; breaks ties between equal timestamps.
    by_task: HashMap<TaskId, Vec<Comment>>,
}

impl InMemoryCommentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> CommentRepositoryError {
    CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn store(&self, comment: &Comment) -> CommentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.ids.insert(comment.id()) {
            return Err(CommentRepositoryError::DuplicateComment(comment.id()));
        }
        state
            .by_task
            .entry(comment.task())
            .or_default()
            .push(comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CommentId) -> CommentRepositoryResult<Option<Comment>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .by_task
            .values()
            .flatten()
            .find(|comment| comment.id() == id)
            .cloned())
    }

    async fn list_for_task(
        &self,
        task: TaskId,
        limit: Option<usize>,
    ) -> CommentRepositoryResult<Vec<Comment>> {
        let mut comments = {
            let state = self.state.read().map_err(poisoned)?;
            state.by_task.get(&task).cloned().unwrap_or_default()
        };
        comments.sort_by_key(Comment::created_at);
        if let Some(keep) = limit {
            let excess = comments.len().saturating_sub(keep);
            comments.drain(..excess);
        }
        Ok(comments)
    }
}
