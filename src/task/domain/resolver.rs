//! Resolution of user- or agent-supplied task references.
//!
//! A reference is tried, in order, as an exact task id, a task id prefix,
//! a display id (`PREFIX-N`) and finally a case-insensitive title
//! substring. The first step that matches anything decides the outcome: an
//! ambiguous id prefix never falls through to title matching.

use super::{Board, BoardId, BoardPrefix, DisplayId, Task, TaskId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Summary of a candidate task reported with an ambiguous reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskMatch {
    /// Task identifier.
    pub id: TaskId,
    /// Display identifier, when the owning board is in scope.
    pub display_id: Option<String>,
    /// Task title.
    pub title: String,
}

impl fmt::Display for TaskMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_id {
            Some(display_id) => write!(f, "{display_id} ({}) {}", self.id, self.title),
            None => write!(f, "{} {}", self.id, self.title),
        }
    }
}

/// Errors returned by [`resolve_reference`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No task matched.
    #[error("no task matches '{candidate}'")]
    NotFound {
        /// The reference as given.
        candidate: String,
    },

    /// More than one task matched.
    #[error("'{candidate}' matches {} tasks", matches.len())]
    Ambiguous {
        /// The reference as given.
        candidate: String,
        /// Every matching task, in id order.
        matches: Vec<TaskMatch>,
    },
}

/// Resolves `candidate` to exactly one task of `tasks`.
///
/// `boards` supplies display prefixes; tasks whose board is absent can still
/// be resolved by id or title. The result does not depend on the order of
/// `tasks`.
///
/// # Errors
///
/// Returns [`ResolveError::NotFound`] when nothing matches and
/// [`ResolveError::Ambiguous`] when a step matches several tasks.
pub fn resolve_reference<'a>(
    candidate: &str,
    tasks: &'a [Task],
    boards: &[Board],
) -> Result<&'a Task, ResolveError> {
    let needle = candidate.trim();
    if needle.is_empty() {
        return Err(ResolveError::NotFound {
            candidate: candidate.to_owned(),
        });
    }
    let lowered = needle.to_ascii_lowercase();
    let prefixes: HashMap<BoardId, &BoardPrefix> = boards
        .iter()
        .map(|board| (board.id(), board.prefix()))
        .collect();

    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|task| task.id());

    let exact = select(&ordered, |task| task.id().to_string() == lowered);
    if !exact.is_empty() {
        return decide(candidate, exact, &prefixes);
    }

    let by_prefix = select(&ordered, |task| {
        let id = task.id().to_string();
        id.len() > lowered.len() && id.starts_with(&lowered)
    });
    if !by_prefix.is_empty() {
        return decide(candidate, by_prefix, &prefixes);
    }

    if let Ok(display_id) = DisplayId::parse(needle) {
        let by_display = select(&ordered, |task| {
            task.sequence() == display_id.sequence()
                && prefixes
                    .get(&task.board())
                    .is_some_and(|prefix| *prefix == display_id.prefix())
        });
        if !by_display.is_empty() {
            return decide(candidate, by_display, &prefixes);
        }
    }

    let lowered_title = needle.to_lowercase();
    let by_title = select(&ordered, |task| {
        task.title().to_lowercase().contains(&lowered_title)
    });
    decide(candidate, by_title, &prefixes)
}

fn select<'a>(tasks: &[&'a Task], predicate: impl Fn(&Task) -> bool) -> Vec<&'a Task> {
    tasks.iter().copied().filter(|task| predicate(*task)).collect()
}

fn decide<'a>(
    candidate: &str,
    matches: Vec<&'a Task>,
    prefixes: &HashMap<BoardId, &BoardPrefix>,
) -> Result<&'a Task, ResolveError> {
    match matches.as_slice() {
        [] => Err(ResolveError::NotFound {
            candidate: candidate.to_owned(),
        }),
        [only] => Ok(*only),
        _ => Err(ResolveError::Ambiguous {
            candidate: candidate.to_owned(),
            matches: matches
                .iter()
                .map(|task| TaskMatch {
                    id: task.id(),
                    display_id: prefixes
                        .get(&task.board())
                        .map(|prefix| task.display_id(prefix).to_string()),
                    title: task.title().to_owned(),
                })
                .collect(),
        }),
    }
}
