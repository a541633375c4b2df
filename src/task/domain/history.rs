//! Append-only change log recorded on every task.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Kind of change recorded by a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// The task was created.
    Created,
    /// Scalar fields such as title, priority or the blocker set changed.
    Updated,
    /// The task changed column.
    Moved,
    /// A blocking edge was added.
    Blocked,
    /// A blocking edge was removed.
    Unblocked,
    /// The resume trigger moved the task out of `need_input`.
    AutoResumed,
}

/// Kind of writer responsible for a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// A human using an interactive surface.
    User,
    /// An AI agent.
    Agent,
    /// The command-line client.
    Cli,
    /// The orchestration core itself.
    System,
}

/// Who performed a change, with optional free-form detail such as a user
/// name or agent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Writer kind.
    pub actor: Actor,
    /// Optional writer detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Attribution {
    /// Attribution without detail.
    #[must_use]
    pub const fn new(actor: Actor) -> Self {
        Self {
            actor,
            detail: None,
        }
    }

    /// Attribution for the core itself.
    #[must_use]
    pub const fn system() -> Self {
        Self::new(Actor::System)
    }

    /// Attribution for the command-line client.
    #[must_use]
    pub const fn cli() -> Self {
        Self::new(Actor::Cli)
    }

    /// Sets the writer detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Field-level before/after values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Value before the change.
    pub from: Value,
    /// Value after the change.
    pub to: Value,
}

/// One immutable entry of a task's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    timestamp: DateTime<Utc>,
    action: HistoryAction,
    actor: Actor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actor_detail: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    changes: BTreeMap<String, FieldChange>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
}

impl HistoryEntry {
    /// Starts an entry stamped with the current clock time.
    #[must_use]
    pub fn new(action: HistoryAction, attribution: &Attribution, clock: &impl Clock) -> Self {
        Self {
            timestamp: clock.utc(),
            action,
            actor: attribution.actor,
            actor_detail: attribution.detail.clone(),
            changes: BTreeMap::new(),
            metadata: Map::new(),
        }
    }

    /// Records a field-level change.
    #[must_use]
    pub fn with_change(
        mut self,
        field: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.changes.insert(
            field.into(),
            FieldChange {
                from: from.into(),
                to: to.into(),
            },
        );
        self
    }

    /// Attaches a metadata value.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns when the change happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn action(&self) -> HistoryAction {
        self.action
    }

    /// Returns the writer kind.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    /// Returns the writer detail, if any.
    #[must_use]
    pub fn actor_detail(&self) -> Option<&str> {
        self.actor_detail.as_deref()
    }

    /// Returns field-level changes keyed by field name.
    #[must_use]
    pub const fn changes(&self) -> &BTreeMap<String, FieldChange> {
        &self.changes
    }

    /// Returns the change for one field, if recorded.
    #[must_use]
    pub fn change(&self, field: &str) -> Option<&FieldChange> {
        self.changes.get(field)
    }

    /// Returns free-form metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}
