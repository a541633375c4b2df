//! Agent session attached to a task.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// The agent conversation that last worked on a task.
///
/// The resume trigger uses it to continue the same conversation once a human
/// answers. Fields default to empty so partially populated records still
/// parse; [`AgentSession::is_empty`] tells them apart from real sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSession {
    /// Agent tool name, for example `claude`.
    #[serde(default)]
    pub tool: String,
    /// Tool-specific session reference.
    #[serde(default, rename = "ref", alias = "session_ref", alias = "session_id")]
    pub session_ref: String,
    /// Directory the agent was running in.
    #[serde(
        default,
        alias = "cwd",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_working_dir"
    )]
    pub working_dir: Option<Utf8PathBuf>,
}

impl AgentSession {
    /// Creates a session for `tool` and `session_ref`.
    #[must_use]
    pub fn new(tool: impl Into<String>, session_ref: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            session_ref: session_ref.into(),
            working_dir: None,
        }
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_working_dir(mut self, working_dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());
        self
    }

    /// Returns `true` when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tool.trim().is_empty()
            && self.session_ref.trim().is_empty()
            && self.working_dir.as_ref().is_none_or(|dir| dir.as_str().trim().is_empty())
    }
}

fn deserialize_working_dir<'de, D>(deserializer: D) -> Result<Option<Utf8PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|dir| dir.trim().to_owned())
        .filter(|dir| !dir.is_empty())
        .map(Utf8PathBuf::from))
}
