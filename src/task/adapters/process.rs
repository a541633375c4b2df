//! Process executor backed by `tokio::process`.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::task::{
    domain::ResumeCommand,
    ports::{ProcessError, ProcessExecutor, ProcessExit, ProcessResult},
};

/// Runs resume commands as child processes.
///
/// Standard input is closed and output is discarded; the agent tool writes
/// its own transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessExecutor;

impl TokioProcessExecutor {
    /// Creates an executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessExecutor for TokioProcessExecutor {
    async fn run(&self, command: &ResumeCommand) -> ProcessResult<ProcessExit> {
        let mut child = Command::new(command.program())
            .args(command.args())
            .current_dir(command.working_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| ProcessError::Spawn {
                program: command.program().to_owned(),
                reason: err.to_string(),
            })?;
        let status = child.wait().await.map_err(ProcessError::runtime)?;
        Ok(ProcessExit::new(status.code()))
    }
}
