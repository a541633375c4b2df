//! Error types for task domain validation and parsing.

use super::{Column, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The board prefix is not 1-10 ASCII alphanumeric characters.
    #[error("invalid board prefix '{0}', expected 1-10 ASCII letters or digits")]
    InvalidPrefix(String),

    /// The board name is empty after trimming.
    #[error("board name must not be empty")]
    EmptyBoardName,

    /// A task was asked to block itself.
    #[error("task {0} cannot block itself")]
    SelfBlock(TaskId),

    /// A position value is NaN or infinite.
    #[error("position must be a finite number, got {0}")]
    InvalidPosition(f64),

    /// The resume transition was requested for a task that is not waiting on input.
    #[error("task {task} is in column {column}, expected need_input")]
    NotAwaitingInput {
        /// Task identifier.
        task: TaskId,
        /// Column the task was found in.
        column: Column,
    },

    /// The board does not define the requested column.
    #[error("column {0} is not defined on this board")]
    ColumnNotOnBoard(Column),

    /// A display identifier could not be parsed.
    #[error("invalid display id '{0}', expected PREFIX-NUMBER")]
    InvalidDisplayId(String),
}

/// Error returned while parsing a domain enumeration from its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseValueError {
    /// Name of the value kind being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
