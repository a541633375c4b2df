//! Opaque task records as held by a generic key-value record store.
//!
//! Scalar columns are typed; JSON-typed columns are kept as [`RawField`] and
//! decoded only through the parsers in [`crate::task::domain::wire`].

use crate::task::{
    domain::{
        BoardId, Column, PersistedTaskData, Position, Priority, Task, TaskId,
        wire::{RawField, parse_agent_session, parse_blocked_by, parse_history},
    },
    ports::TaskRepositoryError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage shape of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Record identifier.
    pub id: TaskId,
    /// Owning board.
    pub board: BoardId,
    /// Per-board sequence.
    pub sequence: u64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Column name.
    pub column: String,
    /// Priority name.
    pub priority: String,
    /// Ordering key.
    pub position: f64,
    /// JSON array of blocker ids.
    #[serde(default)]
    pub blocked_by: RawField,
    /// JSON object describing the agent session.
    #[serde(default)]
    pub agent_session: RawField,
    /// JSON array of history entries.
    #[serde(default)]
    pub history: RawField,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Encodes a task using native JSON for every JSON-typed column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when a field cannot be
    /// encoded.
    pub fn from_task(task: &Task) -> Result<Self, TaskRepositoryError> {
        Ok(Self {
            id: task.id(),
            board: task.board(),
            sequence: task.sequence(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            column: task.column().as_str().to_owned(),
            priority: task.priority().as_str().to_owned(),
            position: task.position().value(),
            blocked_by: RawField::Native(
                serde_json::to_value(task.blocked_by()).map_err(TaskRepositoryError::persistence)?,
            ),
            agent_session: RawField::Native(
                task.agent_session()
                    .map(serde_json::to_value)
                    .transpose()
                    .map_err(TaskRepositoryError::persistence)?
                    .unwrap_or(Value::Null),
            ),
            history: RawField::Native(
                serde_json::to_value(task.history()).map_err(TaskRepositoryError::persistence)?,
            ),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        })
    }

    /// Decodes the record back into a task.
    ///
    /// Absent JSON columns decode to their empty value. A present but
    /// malformed blocker set or history is rejected so that a later write
    /// cannot silently drop it. A malformed agent session reads as absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::CorruptRecord`] for unknown column or
    /// priority names, non-finite positions, and malformed blocker or
    /// history columns.
    pub fn into_task(self) -> Result<Task, TaskRepositoryError> {
        let id = self.id;
        let corrupt = |reason: String| TaskRepositoryError::CorruptRecord { id, reason };

        let column =
            Column::try_from(self.column.as_str()).map_err(|err| corrupt(err.to_string()))?;
        let priority =
            Priority::try_from(self.priority.as_str()).map_err(|err| corrupt(err.to_string()))?;
        let position = Position::new(self.position).map_err(|err| corrupt(err.to_string()))?;
        let blocked_by = decode_optional(&self.blocked_by, parse_blocked_by)
            .ok_or_else(|| corrupt("malformed blocked_by".to_owned()))?;
        let history = decode_optional(&self.history, parse_history)
            .ok_or_else(|| corrupt("malformed history".to_owned()))?;

        Ok(Task::from_persisted(PersistedTaskData {
            id,
            board: self.board,
            sequence: self.sequence,
            title: self.title,
            description: self.description,
            column,
            priority,
            position,
            blocked_by,
            agent_session: parse_agent_session(&self.agent_session),
            history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Returns the parsed value, the default for an absent field, or `None` for
/// a present field the parser rejects.
fn decode_optional<T: Default>(
    raw: &RawField,
    parse: impl Fn(&RawField) -> Option<T>,
) -> Option<T> {
    if raw.to_value().is_none() {
        return Some(T::default());
    }
    parse(raw)
}
