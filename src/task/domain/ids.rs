//! Identifier and validated scalar types for the task domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a task record.
    ///
    /// The display form is the lowercase hyphenated UUID; reference
    /// resolution matches prefixes against that form.
    TaskId
);

uuid_identifier!(
    /// Unique identifier for a board record.
    BoardId
);

uuid_identifier!(
    /// Unique identifier for a comment record.
    CommentId
);

/// Immutable board prefix used to build display identifiers.
///
/// Prefixes are stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardPrefix(String);

impl BoardPrefix {
    const MAX_LEN: usize = 10;

    /// Creates a validated board prefix.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPrefix`] when the value is empty,
    /// longer than ten characters, or contains anything other than ASCII
    /// letters and digits.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let is_valid = !trimmed.is_empty()
            && trimmed.len() <= Self::MAX_LEN
            && trimmed.chars().all(|ch| ch.is_ascii_alphanumeric());
        if !is_valid {
            return Err(TaskDomainError::InvalidPrefix(raw));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the prefix as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BoardPrefix {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BoardPrefix> for String {
    fn from(value: BoardPrefix) -> Self {
        value.0
    }
}

impl fmt::Display for BoardPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-facing task identifier: board prefix plus per-board sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayId {
    prefix: BoardPrefix,
    sequence: u64,
}

impl DisplayId {
    /// Creates a display identifier from its parts.
    #[must_use]
    pub const fn new(prefix: BoardPrefix, sequence: u64) -> Self {
        Self { prefix, sequence }
    }

    /// Parses `PREFIX-NUMBER`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDisplayId`] when the value has no
    /// dash, a malformed prefix, or a non-numeric sequence.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidDisplayId(value.to_owned());
        let (prefix, sequence) = value.trim().rsplit_once('-').ok_or_else(invalid)?;
        let parsed_prefix = BoardPrefix::new(prefix).map_err(|_| invalid())?;
        let parsed_sequence = sequence.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self::new(parsed_prefix, parsed_sequence))
    }

    /// Returns the board prefix.
    #[must_use]
    pub const fn prefix(&self) -> &BoardPrefix {
        &self.prefix
    }

    /// Returns the per-board sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.sequence)
    }
}
