//! In-memory adapters for tests and embedding.

mod board;
mod comment;
mod task;

pub use board::InMemoryBoardRepository;
pub use comment::InMemoryCommentRepository;
pub use task::InMemoryTaskRepository;
