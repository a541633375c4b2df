//! Process executor port used to run agent resume commands.

use crate::task::domain::ResumeCommand;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for process executor operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// How a finished process exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    code: Option<i32>,
}

impl ProcessExit {
    /// Creates an exit record. `None` means the process was killed by a
    /// signal.
    #[must_use]
    pub const fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Returns the exit code, if the process exited normally.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        self.code
    }

    /// Returns `true` for exit code zero.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Runs external commands to completion.
///
/// The resume trigger calls this from a detached task and only logs the
/// result, so implementations may block for as long as the command runs.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Runs `command` in its working directory and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Spawn`] when the process cannot be started.
    async fn run(&self, command: &ResumeCommand) -> ProcessResult<ProcessExit>;
}

/// Errors returned by process executor implementations.
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The process could not be started.
    #[error("failed to start {program}: {reason}")]
    Spawn {
        /// Executable name.
        program: String,
        /// Underlying cause.
        reason: String,
    },

    /// Generic runtime failure.
    #[error("process runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProcessError {
    /// Wraps a runtime error from the executor adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
