//! Task comments and mention extraction.

use super::{CommentId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Mention token that asks the agent to pick a task back up.
pub const AGENT_MENTION: &str = "@agent";

static MENTION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").ok());

/// Extracts `@name` mention tokens from free text.
///
/// Tokens match `@[A-Za-z0-9_]+` and keep their leading `@`, so callers
/// compare them by exact string.
#[must_use]
pub fn extract_mentions(content: &str) -> BTreeSet<String> {
    MENTION_PATTERN
        .as_ref()
        .map(|pattern| {
            pattern
                .find_iter(content)
                .map(|found| found.as_str().to_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Who wrote a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorType {
    /// A person.
    Human,
    /// An AI agent.
    Agent,
}

/// An immutable comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    task: TaskId,
    content: String,
    author_type: AuthorType,
    mentions: BTreeSet<String>,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment, extracting mentions from `content`.
    #[must_use]
    pub fn new(
        task: TaskId,
        content: impl Into<String>,
        author_type: AuthorType,
        clock: &impl Clock,
    ) -> Self {
        let text = content.into();
        let mentions = extract_mentions(&text);
        Self {
            id: CommentId::new(),
            task,
            content: text,
            author_type,
            mentions,
            created_at: clock.utc(),
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the comment text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the author kind.
    #[must_use]
    pub const fn author_type(&self) -> AuthorType {
        self.author_type
    }

    /// Returns the mention tokens extracted at creation time.
    #[must_use]
    pub const fn mentions(&self) -> &BTreeSet<String> {
        &self.mentions
    }

    /// Returns `true` when the exact `token` was mentioned.
    #[must_use]
    pub fn mentions_token(&self, token: &str) -> bool {
        self.mentions.contains(token)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
