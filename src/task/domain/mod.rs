//! Domain model for task orchestration.
//!
//! The task domain models tasks, boards and comments together with the pure
//! algorithms that act on them: reference resolution, fractional ordering,
//! the blocking-dependency graph and resume command construction. All
//! infrastructure concerns stay outside the domain boundary.

mod board;
mod column;
mod comment;
mod error;
mod graph;
mod history;
mod ids;
mod position;
mod resolver;
mod resume;
mod session;
mod task;
pub mod wire;

pub use board::{Board, ResumeMode};
pub use column::Column;
pub use comment::{AGENT_MENTION, AuthorType, Comment, extract_mentions};
pub use error::{ParseValueError, TaskDomainError};
pub use graph::{DependencyGraph, GraphError, Suggestion, SuggestionTier};
pub use history::{Actor, Attribution, FieldChange, HistoryAction, HistoryEntry};
pub use ids::{BoardId, BoardPrefix, CommentId, DisplayId, TaskId};
pub use position::Position;
pub use resolver::{ResolveError, TaskMatch, resolve_reference};
pub use resume::{ResumeBuildError, ResumeCommand, ResumePayload, ResumeTool};
pub use session::AgentSession;
pub use task::{NewTaskData, PersistedTaskData, Priority, Task, TaskUpdate};
