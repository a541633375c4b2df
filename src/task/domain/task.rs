//! Task aggregate root and related task lifecycle types.

use super::{
    AgentSession, Attribution, BoardId, BoardPrefix, Column, CommentId, DisplayId, HistoryAction,
    HistoryEntry, ParseValueError, Position, TaskDomainError, TaskId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Task priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Nice to have.
    Low,
    /// The default.
    #[default]
    Medium,
    /// Should be picked before medium work.
    High,
    /// Should be picked before anything else that is ready.
    Urgent,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseValueError::new("priority", value)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskData {
    /// Owning board.
    pub board: BoardId,
    /// Sequence allocated by the board.
    pub sequence: u64,
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Initial column.
    pub column: Column,
    /// Initial priority.
    pub priority: Priority,
    /// Initial position within the column.
    pub position: Position,
    /// Who created the task.
    pub created_by: Attribution,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    board: BoardId,
    sequence: u64,
    title: String,
    description: Option<String>,
    column: Column,
    priority: Priority,
    position: Position,
    blocked_by: BTreeSet<TaskId>,
    agent_session: Option<AgentSession>,
    history: Vec<HistoryEntry>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning board.
    pub board: BoardId,
    /// Persisted per-board sequence.
    pub sequence: u64,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted column.
    pub column: Column,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted position.
    pub position: Position,
    /// Persisted blocker set.
    pub blocked_by: BTreeSet<TaskId>,
    /// Persisted agent session, if any.
    pub agent_session: Option<AgentSession>,
    /// Persisted history log.
    pub history: Vec<HistoryEntry>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task with an initial `created` history entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = normalize_title(&data.title)?;
        let timestamp = clock.utc();
        let created = HistoryEntry::new(HistoryAction::Created, &data.created_by, clock)
            .with_metadata("column", data.column.as_str())
            .with_metadata("sequence", data.sequence);

        Ok(Self {
            id: TaskId::new(),
            board: data.board,
            sequence: data.sequence,
            title,
            description: data.description,
            column: data.column,
            priority: data.priority,
            position: data.position,
            blocked_by: BTreeSet::new(),
            agent_session: None,
            history: vec![created],
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// A self-reference in the persisted blocker set is dropped.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let mut blocked_by = data.blocked_by;
        blocked_by.remove(&data.id);
        Self {
            id: data.id,
            board: data.board,
            sequence: data.sequence,
            title: data.title,
            description: data.description,
            column: data.column,
            priority: data.priority,
            position: data.position,
            blocked_by,
            agent_session: data.agent_session,
            history: data.history,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board(&self) -> BoardId {
        self.board
    }

    /// Returns the per-board sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the display identifier under the board's prefix.
    #[must_use]
    pub fn display_id(&self, prefix: &BoardPrefix) -> DisplayId {
        DisplayId::new(prefix.clone(), self.sequence)
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current column.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the ordering key within the column.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the ids of tasks blocking this one.
    #[must_use]
    pub const fn blocked_by(&self) -> &BTreeSet<TaskId> {
        &self.blocked_by
    }

    /// Returns the agent session, if any.
    #[must_use]
    pub const fn agent_session(&self) -> Option<&AgentSession> {
        self.agent_session.as_ref()
    }

    /// Returns the history log, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Changes title, description and priority, recording one `updated`
    /// entry that lists every field that actually changed.
    ///
    /// Returns `false` without touching history when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when a blank title is given.
    pub fn apply_update(
        &mut self,
        update: TaskUpdate,
        by: &Attribution,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        let mut entry = HistoryEntry::new(HistoryAction::Updated, by, clock);
        let mut changed = false;

        if let Some(raw_title) = update.title {
            let title = normalize_title(&raw_title)?;
            if title != self.title {
                entry = entry.with_change("title", self.title.as_str(), title.as_str());
                self.title = title;
                changed = true;
            }
        }
        if let Some(description) = update
            .description
            .filter(|candidate| self.description.as_deref() != Some(candidate.as_str()))
        {
            let before = self.description.clone().map_or(Value::Null, Value::from);
            entry = entry.with_change("description", before, description.as_str());
            self.description = Some(description);
            changed = true;
        }
        if let Some(priority) = update.priority.filter(|candidate| *candidate != self.priority) {
            entry = entry.with_change("priority", self.priority.as_str(), priority.as_str());
            self.priority = priority;
            changed = true;
        }

        if changed {
            self.record(entry, clock);
        }
        Ok(changed)
    }

    /// Places the task at `position` in `column`.
    ///
    /// A column change records a `moved` entry; reordering within the same
    /// column only updates the key.
    pub fn move_to(
        &mut self,
        column: Column,
        position: Position,
        by: &Attribution,
        clock: &impl Clock,
    ) {
        let previous = self.column;
        self.column = column;
        self.position = position;
        if previous == column {
            self.touch(clock);
            return;
        }
        let entry = HistoryEntry::new(HistoryAction::Moved, by, clock)
            .with_change("column", previous.as_str(), column.as_str());
        self.record(entry, clock);
    }

    /// Replaces the ordering key without recording history.
    ///
    /// Used when a column is rebalanced; relative order is unchanged.
    pub const fn reposition(&mut self, position: Position) {
        self.position = position;
    }

    /// Adds a blocker.
    ///
    /// Returns `false` when the edge already existed. Cycle validation needs
    /// the whole graph and happens in the dependency service.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfBlock`] when `blocker` is this task.
    pub fn add_blocker(
        &mut self,
        blocker: TaskId,
        by: &Attribution,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        if blocker == self.id {
            return Err(TaskDomainError::SelfBlock(self.id));
        }
        let before = blocked_by_value(&self.blocked_by);
        if !self.blocked_by.insert(blocker) {
            return Ok(false);
        }
        let entry = HistoryEntry::new(HistoryAction::Blocked, by, clock)
            .with_change("blocked_by", before, blocked_by_value(&self.blocked_by))
            .with_metadata("blocker", blocker.to_string());
        self.record(entry, clock);
        Ok(true)
    }

    /// Removes a blocker. Returns `false` when the edge did not exist.
    pub fn remove_blocker(
        &mut self,
        blocker: TaskId,
        by: &Attribution,
        clock: &impl Clock,
    ) -> bool {
        let before = blocked_by_value(&self.blocked_by);
        if !self.blocked_by.remove(&blocker) {
            return false;
        }
        let entry = HistoryEntry::new(HistoryAction::Unblocked, by, clock)
            .with_change("blocked_by", before, blocked_by_value(&self.blocked_by))
            .with_metadata("blocker", blocker.to_string());
        self.record(entry, clock);
        true
    }

    /// Replaces the whole blocker set with one `updated` entry.
    ///
    /// Returns `false` when the set is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfBlock`] when the set contains this
    /// task.
    pub fn replace_blockers(
        &mut self,
        blockers: BTreeSet<TaskId>,
        by: &Attribution,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        if blockers.contains(&self.id) {
            return Err(TaskDomainError::SelfBlock(self.id));
        }
        if blockers == self.blocked_by {
            return Ok(false);
        }
        let entry = HistoryEntry::new(HistoryAction::Updated, by, clock).with_change(
            "blocked_by",
            blocked_by_value(&self.blocked_by),
            blocked_by_value(&blockers),
        );
        self.blocked_by = blockers;
        self.record(entry, clock);
        Ok(true)
    }

    /// Attaches or clears the agent session. Empty sessions are stored as
    /// absent.
    pub fn set_agent_session(&mut self, session: Option<AgentSession>, clock: &impl Clock) {
        self.agent_session = session.filter(|candidate| !candidate.is_empty());
        self.touch(clock);
    }

    /// Moves a task waiting on input back to `in_progress` at `position` on
    /// behalf of the resume trigger, recording an `auto_resumed` entry that
    /// names the triggering comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAwaitingInput`] unless the task is in
    /// `need_input`.
    pub fn resume_from_input(
        &mut self,
        trigger_comment: CommentId,
        position: Position,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.column != Column::NeedInput {
            return Err(TaskDomainError::NotAwaitingInput {
                task: self.id,
                column: self.column,
            });
        }
        self.column = Column::InProgress;
        self.position = position;
        let entry = HistoryEntry::new(HistoryAction::AutoResumed, &Attribution::system(), clock)
            .with_change(
                "column",
                Column::NeedInput.as_str(),
                Column::InProgress.as_str(),
            )
            .with_metadata("trigger_comment", trigger_comment.to_string());
        self.record(entry, clock);
        Ok(())
    }

    fn record(&mut self, entry: HistoryEntry, clock: &impl Clock) {
        self.history.push(entry);
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Optional field changes applied by [`Task::apply_update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
}

fn normalize_title(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn blocked_by_value(blocked_by: &BTreeSet<TaskId>) -> Value {
    Value::Array(
        blocked_by
            .iter()
            .map(|id| Value::String(id.to_string()))
            .collect(),
    )
}
