//! Boards own tasks, display prefixes and the resume policy.

use super::{BoardId, BoardPrefix, Column, ParseValueError, TaskDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How tasks waiting on human input are resumed after a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeMode {
    /// A person resumes the agent by hand.
    #[default]
    Manual,
    /// A person runs an explicit resume command.
    Command,
    /// The resume trigger resumes the agent when it is mentioned.
    Auto,
}

impl ResumeMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Command => "command",
            Self::Auto => "auto",
        }
    }
}

impl TryFrom<&str> for ResumeMode {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "command" => Ok(Self::Command),
            "auto" => Ok(Self::Auto),
            _ => Err(ParseValueError::new("resume mode", value)),
        }
    }
}

impl fmt::Display for ResumeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A board of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    name: String,
    prefix: BoardPrefix,
    resume_mode: ResumeMode,
    columns: Vec<Column>,
    next_sequence: u64,
    created_at: DateTime<Utc>,
}

impl Board {
    /// Creates a board with every column and manual resume.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyBoardName`] when `name` is blank.
    pub fn new(
        name: impl Into<String>,
        prefix: BoardPrefix,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyBoardName);
        }
        Ok(Self {
            id: BoardId::new(),
            name: trimmed.to_owned(),
            prefix,
            resume_mode: ResumeMode::default(),
            columns: Column::ALL.to_vec(),
            next_sequence: 1,
            created_at: clock.utc(),
        })
    }

    /// Sets the resume mode.
    #[must_use]
    pub const fn with_resume_mode(mut self, resume_mode: ResumeMode) -> Self {
        self.resume_mode = resume_mode;
        self
    }

    /// Restricts the board to `columns`, kept in workflow order.
    #[must_use]
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        let mut ordered: Vec<Column> = columns.into_iter().collect();
        ordered.sort_unstable();
        ordered.dedup();
        self.columns = ordered;
        self
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display prefix.
    #[must_use]
    pub const fn prefix(&self) -> &BoardPrefix {
        &self.prefix
    }

    /// Returns the resume mode.
    #[must_use]
    pub const fn resume_mode(&self) -> ResumeMode {
        self.resume_mode
    }

    /// Returns the valid columns in workflow order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the sequence the next task will receive.
    #[must_use]
    pub const fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Fails unless the board defines `column`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ColumnNotOnBoard`].
    pub fn ensure_column(&self, column: Column) -> Result<(), TaskDomainError> {
        if self.columns.contains(&column) {
            Ok(())
        } else {
            Err(TaskDomainError::ColumnNotOnBoard(column))
        }
    }

    /// Hands out the next per-board sequence number.
    pub const fn allocate_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = sequence.saturating_add(1);
        sequence
    }
}
