//! Application services for task orchestration.

mod comment;
mod dependency;
mod lifecycle;
mod ordering;
mod prompt;
mod resume;

pub use comment::{AddCommentRequest, CommentAdded, CommentService, CommentServiceError};
pub use dependency::{
    BlockFilter, DependencyError, DependencyResult, DependencyService, ListFilter, RankedTask,
};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
pub use ordering::{MoveTaskRequest, OrderingError, OrderingResult, OrderingService, Placement};
pub use resume::{
    LookupFailure, ResumeError, ResumeOutcome, ResumeResult, ResumeTriggerService, SkipReason,
};
