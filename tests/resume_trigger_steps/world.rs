//! Shared world state for resume trigger BDD scenarios.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use tasklane::{
    config::OrchestrationConfig,
    task::{
        adapters::memory::{
            InMemoryBoardRepository, InMemoryCommentRepository, InMemoryTaskRepository,
        },
        domain::{Board, ResumeCommand, Task},
        ports::{ProcessError, ProcessExecutor, ProcessExit, ProcessResult},
        services::{CommentAdded, CommentService, ResumeTriggerService, TaskLifecycleService},
    },
};
use tokio::sync::mpsc;

/// Executor that reports each launched command on a channel.
#[derive(Debug)]
pub struct ChannelExecutor {
    sender: mpsc::UnboundedSender<ResumeCommand>,
}

#[async_trait]
impl ProcessExecutor for ChannelExecutor {
    async fn run(&self, command: &ResumeCommand) -> ProcessResult<ProcessExit> {
        self.sender
            .send(command.clone())
            .map_err(ProcessError::runtime)?;
        Ok(ProcessExit::new(Some(0)))
    }
}

/// Lifecycle service used by the BDD world.
pub type TestLifecycle =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryBoardRepository, DefaultClock>;

/// Comment service used by the BDD world.
pub type TestComments = CommentService<
    InMemoryTaskRepository,
    InMemoryBoardRepository,
    InMemoryCommentRepository,
    ChannelExecutor,
    DefaultClock,
>;

/// Scenario world for resume trigger behaviour tests.
pub struct ResumeWorld {
    pub boards: Arc<InMemoryBoardRepository>,
    pub comment_store: Arc<InMemoryCommentRepository>,
    pub lifecycle: TestLifecycle,
    pub comments: TestComments,
    pub launches: mpsc::UnboundedReceiver<ResumeCommand>,
    pub board: Option<Board>,
    pub task: Option<Task>,
    pub last_comment: Option<CommentAdded>,
}

impl ResumeWorld {
    /// Creates a world with empty repositories.
    #[must_use]
    pub fn new() -> Self {
        let config = OrchestrationConfig::default().with_default_working_dir("/srv/agents");
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let boards = Arc::new(InMemoryBoardRepository::new());
        let comment_store = Arc::new(InMemoryCommentRepository::new());
        let clock = Arc::new(DefaultClock);
        let (sender, launches) = mpsc::unbounded_channel();

        let trigger = Arc::new(ResumeTriggerService::new(
            Arc::clone(&tasks),
            Arc::clone(&boards),
            Arc::clone(&comment_store),
            Arc::new(ChannelExecutor { sender }),
            Arc::clone(&clock),
            config.clone(),
        ));
        let lifecycle = TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&boards),
            Arc::clone(&clock),
            config,
        );
        let comments = CommentService::new(tasks, Arc::clone(&comment_store), trigger, clock);

        Self {
            boards,
            comment_store,
            lifecycle,
            comments,
            launches,
            board: None,
            task: None,
            last_comment: None,
        }
    }

    /// Returns the task created by a `Given` step.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the result of the last `When` step.
    ///
    /// # Errors
    ///
    /// Returns an error when no comment has been added yet.
    pub fn last_comment(&self) -> Result<&CommentAdded, eyre::Report> {
        self.last_comment
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing comment result in scenario world"))
    }
}

impl Default for ResumeWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ResumeWorld {
    ResumeWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
