//! Workflow columns.

use super::ParseValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow column a task sits in.
///
/// Variants are declared in workflow-stage order, so `Ord` compares by
/// stage rather than alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Captured but not yet planned.
    Backlog,
    /// Planned and ready to be picked up.
    Todo,
    /// Being worked on.
    InProgress,
    /// Paused until a human answers a question.
    NeedInput,
    /// Awaiting review.
    Review,
    /// Finished. The only terminal column.
    Done,
}

impl Column {
    /// All columns in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::NeedInput,
        Self::Review,
        Self::Done,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::NeedInput => "need_input",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Returns `true` for columns a ready task may be picked from.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::Todo | Self::Backlog)
    }

    /// Returns `true` for the terminal column.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for Column {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "need_input" => Ok(Self::NeedInput),
            "review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            _ => Err(ParseValueError::new("column", value)),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
