//! In-memory board repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Board, BoardId},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Thread-safe in-memory board repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    boards: Arc<RwLock<HashMap<BoardId, Board>>>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> BoardRepositoryError {
    BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut boards = self.boards.write().map_err(poisoned)?;
        if boards.contains_key(&board.id()) {
            return Err(BoardRepositoryError::DuplicateBoard(board.id()));
        }
        boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn update(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut boards = self.boards.write().map_err(poisoned)?;
        let slot = boards
            .get_mut(&board.id())
            .ok_or(BoardRepositoryError::NotFound(board.id()))?;
        *slot = board.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        let boards = self.boards.read().map_err(poisoned)?;
        Ok(boards.get(&id).cloned())
    }

    async fn list(&self) -> BoardRepositoryResult<Vec<Board>> {
        let boards = self.boards.read().map_err(poisoned)?;
        let mut all: Vec<Board> = boards.values().cloned().collect();
        all.sort_by_key(|board| (board.created_at(), board.id()));
        Ok(all)
    }

    async fn allocate_sequence(&self, id: BoardId) -> BoardRepositoryResult<u64> {
        let mut boards = self.boards.write().map_err(poisoned)?;
        let board = boards
            .get_mut(&id)
            .ok_or(BoardRepositoryError::NotFound(id))?;
        Ok(board.allocate_sequence())
    }
}
