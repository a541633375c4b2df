//! Resume payloads and the external commands built from them.

use super::AgentSession;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors returned while building a resume command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResumeBuildError {
    /// The agent session lacks a tool or a session reference.
    #[error("invalid agent session: {0}")]
    InvalidSession(String),

    /// No resume command is known for the tool.
    #[error("unsupported agent tool: {0}")]
    UnsupportedTool(String),
}

/// Normalized session details needed to resume an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumePayload {
    tool: String,
    session_ref: String,
    working_dir: Utf8PathBuf,
}

impl ResumePayload {
    /// Builds a payload from a stored session, using `default_dir` when the
    /// session has no working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeBuildError::InvalidSession`] when the tool or session
    /// reference is blank.
    pub fn from_session(
        session: &AgentSession,
        default_dir: &Utf8Path,
    ) -> Result<Self, ResumeBuildError> {
        let tool = session.tool.trim();
        if tool.is_empty() {
            return Err(ResumeBuildError::InvalidSession(
                "missing tool name".to_owned(),
            ));
        }
        let session_ref = session.session_ref.trim();
        if session_ref.is_empty() {
            return Err(ResumeBuildError::InvalidSession(format!(
                "missing session reference for tool {tool}"
            )));
        }
        let working_dir = session
            .working_dir
            .clone()
            .unwrap_or_else(|| default_dir.to_owned());
        Ok(Self {
            tool: tool.to_owned(),
            session_ref: session_ref.to_owned(),
            working_dir,
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Returns the session reference.
    #[must_use]
    pub fn session_ref(&self) -> &str {
        &self.session_ref
    }

    /// Returns the working directory.
    #[must_use]
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }
}

/// Agent tools with a known resume command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResumeTool {
    /// Claude Code: `claude --resume <ref> -p <prompt>`.
    Claude,
    /// Codex CLI: `codex exec resume <ref> <prompt>`.
    Codex,
    /// opencode: `opencode run --session <ref> <prompt>`.
    Opencode,
}

impl ResumeTool {
    /// Returns the executable name.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Opencode => "opencode",
        }
    }

    fn arguments(self, session_ref: &str, prompt: &str) -> Vec<String> {
        let parts = match self {
            Self::Claude => ["--resume", session_ref, "-p", prompt],
            Self::Codex => ["exec", "resume", session_ref, prompt],
            Self::Opencode => ["run", "--session", session_ref, prompt],
        };
        parts.into_iter().map(str::to_owned).collect()
    }
}

impl TryFrom<&str> for ResumeTool {
    type Error = ResumeBuildError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "claude" | "claude-code" | "claude_code" => Ok(Self::Claude),
            "codex" => Ok(Self::Codex),
            "opencode" => Ok(Self::Opencode),
            _ => Err(ResumeBuildError::UnsupportedTool(value.to_owned())),
        }
    }
}

/// A fully built external command that resumes an agent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeCommand {
    program: String,
    args: Vec<String>,
    working_dir: Utf8PathBuf,
}

impl ResumeCommand {
    /// Builds the resume command for `payload` with `prompt` as the new
    /// user turn.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeBuildError::UnsupportedTool`] for unknown tools.
    pub fn build(payload: &ResumePayload, prompt: &str) -> Result<Self, ResumeBuildError> {
        let tool = ResumeTool::try_from(payload.tool())?;
        Ok(Self {
            program: tool.program().to_owned(),
            args: tool.arguments(payload.session_ref(), prompt),
            working_dir: payload.working_dir().to_owned(),
        })
    }

    /// Returns the executable name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the directory to run in.
    #[must_use]
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }
}

impl fmt::Display for ResumeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The prompt argument can be long; show only its size.
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains('\n') || arg.len() > 80 {
                write!(f, " <{} bytes>", arg.len())?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        write!(f, " (in {})", self.working_dir)
    }
}
