//! Shared wiring for in-memory orchestration integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::DefaultClock;
use tasklane::{
    config::OrchestrationConfig,
    task::{
        adapters::memory::{
            InMemoryBoardRepository, InMemoryCommentRepository, InMemoryTaskRepository,
        },
        domain::{Attribution, Board, BoardPrefix, Column, ResumeCommand, ResumeMode, Task},
        ports::{BoardRepository, ProcessError, ProcessExecutor, ProcessExit, ProcessResult},
        services::{
            CommentService, CreateTaskRequest, DependencyService, OrderingService,
            ResumeTriggerService, TaskLifecycleService,
        },
    },
};
use tokio::sync::mpsc;

/// Working directory handed to resumed agents.
pub const WORK_DIR: &str = "/srv/agents";

/// Process executor that records launched commands instead of running them.
#[derive(Debug)]
pub struct RecordingExecutor {
    sender: mpsc::UnboundedSender<ResumeCommand>,
}

#[async_trait]
impl ProcessExecutor for RecordingExecutor {
    async fn run(&self, command: &ResumeCommand) -> ProcessResult<ProcessExit> {
        self.sender
            .send(command.clone())
            .map_err(ProcessError::runtime)?;
        Ok(ProcessExit::new(Some(0)))
    }
}

/// Comment service wired to in-memory repositories.
pub type Comments = CommentService<
    InMemoryTaskRepository,
    InMemoryBoardRepository,
    InMemoryCommentRepository,
    RecordingExecutor,
    DefaultClock,
>;

/// Every service of the orchestration core over one set of in-memory
/// repositories and a single board.
pub struct Workspace {
    /// Board every helper creates tasks on.
    pub board: Board,
    /// Lifecycle service.
    pub lifecycle:
        TaskLifecycleService<InMemoryTaskRepository, InMemoryBoardRepository, DefaultClock>,
    /// Ordering service.
    pub ordering: OrderingService<InMemoryTaskRepository, InMemoryBoardRepository, DefaultClock>,
    /// Dependency service.
    pub dependencies: DependencyService<InMemoryTaskRepository, DefaultClock>,
    /// Comment service with the resume hook.
    pub comments: Comments,
    launches: mpsc::UnboundedReceiver<ResumeCommand>,
}

impl Workspace {
    /// Wires services around a fresh board using `prefix` and `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be built or stored.
    pub async fn open(prefix: &str, mode: ResumeMode) -> Result<Self, eyre::Report> {
        let config = OrchestrationConfig::default().with_default_working_dir(WORK_DIR);
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let boards = Arc::new(InMemoryBoardRepository::new());
        let comment_store = Arc::new(InMemoryCommentRepository::new());
        let clock = Arc::new(DefaultClock);
        let (sender, launches) = mpsc::unbounded_channel();

        let board = Board::new(
            format!("{prefix} workspace"),
            BoardPrefix::new(prefix)?,
            &DefaultClock,
        )?
        .with_resume_mode(mode);
        boards.store(&board).await?;

        let trigger = Arc::new(ResumeTriggerService::new(
            Arc::clone(&tasks),
            Arc::clone(&boards),
            Arc::clone(&comment_store),
            Arc::new(RecordingExecutor { sender }),
            Arc::clone(&clock),
            config.clone(),
        ));
        Ok(Self {
            board,
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&boards),
                Arc::clone(&clock),
                config.clone(),
            ),
            ordering: OrderingService::new(
                Arc::clone(&tasks),
                boards,
                Arc::clone(&clock),
                config,
            ),
            dependencies: DependencyService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            comments: CommentService::new(tasks, comment_store, trigger, clock),
            launches,
        })
    }

    /// Creates a task titled `title` at the bottom of `column`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lifecycle service rejects the task.
    pub async fn create(&self, title: &str, column: Column) -> Result<Task, eyre::Report> {
        let request =
            CreateTaskRequest::new(self.board.id(), title, Attribution::cli()).in_column(column);
        Ok(self.lifecycle.create_task(request).await?)
    }

    /// Waits for the next launched resume command.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is launched within five seconds.
    pub async fn next_launch(&mut self) -> Result<ResumeCommand, eyre::Report> {
        tokio::time::timeout(Duration::from_secs(5), self.launches.recv())
            .await?
            .ok_or_else(|| eyre::eyre!("launch channel closed"))
    }

    /// Returns `true` when no command has been launched yet.
    #[must_use]
    pub fn nothing_launched(&mut self) -> bool {
        self.launches.try_recv().is_err()
    }
}
