//! Blocking-dependency graph over a snapshot of tasks.
//!
//! An edge `task -> blocker` means `blocker` appears in `task.blocked_by`.
//! The graph is built from one consistent listing, so a cycle check sees a
//! stable view for its whole traversal.

use super::{Column, Priority, Task, TaskId};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// Errors returned while validating a blocking edge.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A task was asked to block itself.
    #[error("task {0} cannot block itself")]
    SelfBlock(TaskId),

    /// One of the ids does not name a task in the graph.
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),

    /// The edge would close a cycle.
    #[error("task {blocker} already depends on {task}; blocking {task} on it would create a cycle")]
    CycleDetected {
        /// Task that would be blocked.
        task: TaskId,
        /// Proposed blocker.
        blocker: TaskId,
    },
}

#[derive(Debug, Clone)]
struct Node {
    column: Column,
    priority: Priority,
    blocked_by: BTreeSet<TaskId>,
}

/// Snapshot of blocking edges and the column/priority of every task.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<TaskId, Node>,
}

impl DependencyGraph {
    /// Builds a graph from a task listing.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let nodes = tasks
            .into_iter()
            .map(|task| {
                (
                    task.id(),
                    Node {
                        column: task.column(),
                        priority: task.priority(),
                        blocked_by: task.blocked_by().clone(),
                    },
                )
            })
            .collect();
        Self { nodes }
    }

    /// Returns `true` when the graph knows `id`.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of tasks in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` for an empty snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks that `task` may be blocked by `blocker`.
    ///
    /// The cycle check walks the full transitive closure of `blocker`'s
    /// blockers; reaching `task` means the new edge would close a loop.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfBlock`], [`GraphError::UnknownTask`] or
    /// [`GraphError::CycleDetected`].
    pub fn validate_edge(&self, task: TaskId, blocker: TaskId) -> Result<(), GraphError> {
        if task == blocker {
            return Err(GraphError::SelfBlock(task));
        }
        for id in [task, blocker] {
            if !self.contains(id) {
                return Err(GraphError::UnknownTask(id));
            }
        }
        if self.reaches(blocker, task) {
            return Err(GraphError::CycleDetected { task, blocker });
        }
        Ok(())
    }

    /// Records an edge in the snapshot. Callers validate first.
    pub fn insert_edge(&mut self, task: TaskId, blocker: TaskId) {
        if let Some(node) = self.nodes.get_mut(&task) {
            node.blocked_by.insert(blocker);
        }
    }

    /// Drops every outgoing edge of `task` from the snapshot.
    pub fn clear_edges(&mut self, task: TaskId) {
        if let Some(node) = self.nodes.get_mut(&task) {
            node.blocked_by.clear();
        }
    }

    /// Returns `true` when a blocker path leads from `from` to `target`.
    fn reaches(&self, from: TaskId, target: TaskId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(
                    node.blocked_by
                        .iter()
                        .copied()
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
        false
    }

    /// Returns `true` when any blocker of `id` is a known task outside the
    /// terminal column. Dangling blocker ids do not block.
    #[must_use]
    pub fn is_blocked(&self, id: TaskId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| self.has_open_blocker(&node.blocked_by, None))
    }

    /// Returns `true` when `id` is actionable and not blocked.
    #[must_use]
    pub fn is_ready(&self, id: TaskId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| node.column.is_actionable() && !self.is_blocked(id))
    }

    /// Returns the tasks that list `id` as a blocker, in id order.
    #[must_use]
    pub fn dependents(&self, id: TaskId) -> Vec<TaskId> {
        let mut found: Vec<TaskId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.blocked_by.contains(&id))
            .map(|(dependent, _)| *dependent)
            .collect();
        found.sort_unstable();
        found
    }

    /// Counts unfinished tasks that completing `id` would unblock: those
    /// listing `id` whose every other blocker is already done.
    #[must_use]
    pub fn unblock_impact(&self, id: TaskId) -> usize {
        self.nodes
            .iter()
            .filter(|(dependent, node)| {
                **dependent != id
                    && !node.column.is_terminal()
                    && node.blocked_by.contains(&id)
                    && !self.has_open_blocker(&node.blocked_by, Some(id))
            })
            .count()
    }

    fn has_open_blocker(&self, blocked_by: &BTreeSet<TaskId>, ignoring: Option<TaskId>) -> bool {
        blocked_by
            .iter()
            .filter(|blocker| Some(**blocker) != ignoring)
            .filter_map(|blocker| self.nodes.get(blocker))
            .any(|blocker| !blocker.column.is_terminal())
    }

    /// Orders work suggestions.
    ///
    /// Tasks already in progress come first, then urgent ready tasks, then
    /// high-priority ready tasks, then the remaining ready tasks. Within each
    /// tier higher unblock impact wins and ties fall back to task id order.
    /// Blocked, finished and non-actionable tasks are left out.
    #[must_use]
    pub fn rank_suggestions(&self) -> Vec<Suggestion> {
        let mut ranked: Vec<Suggestion> = self
            .nodes
            .iter()
            .filter_map(|(id, node)| {
                let tier = self.tier(*id, node)?;
                Some(Suggestion {
                    task: *id,
                    tier,
                    unblock_impact: self.unblock_impact(*id),
                })
            })
            .collect();
        ranked.sort_by_key(|suggestion| {
            (
                suggestion.tier,
                Reverse(suggestion.unblock_impact),
                suggestion.task,
            )
        });
        ranked
    }

    fn tier(&self, id: TaskId, node: &Node) -> Option<SuggestionTier> {
        if node.column == Column::InProgress {
            return Some(SuggestionTier::InProgress);
        }
        if !self.is_ready(id) {
            return None;
        }
        Some(match node.priority {
            Priority::Urgent => SuggestionTier::UrgentReady,
            Priority::High => SuggestionTier::HighReady,
            Priority::Medium | Priority::Low => SuggestionTier::Ready,
        })
    }
}

/// Ranking bucket of a suggestion, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SuggestionTier {
    /// Already being worked on.
    InProgress,
    /// Ready with urgent priority.
    UrgentReady,
    /// Ready with high priority.
    HighReady,
    /// Any other ready task.
    Ready,
}

/// One ranked work suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    /// Suggested task.
    pub task: TaskId,
    /// Ranking bucket.
    pub tier: SuggestionTier,
    /// Tasks that finishing this one would unblock.
    pub unblock_impact: usize,
}
