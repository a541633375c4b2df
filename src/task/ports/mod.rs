//! Port contracts for task orchestration.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod board;
pub mod comment;
pub mod process;
pub mod repository;

pub use board::{BoardRepository, BoardRepositoryError, BoardRepositoryResult};
pub use comment::{CommentRepository, CommentRepositoryError, CommentRepositoryResult};
pub use process::{ProcessError, ProcessExecutor, ProcessExit, ProcessResult};
pub use repository::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
