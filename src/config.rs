//! Orchestration settings passed explicitly to services.
//!
//! Hosts build one [`OrchestrationConfig`] (by hand or by deserializing it
//! from whatever format they load) and hand it to each service constructor.

use camino::Utf8PathBuf;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::task::domain::{AGENT_MENTION, Position};

/// Tunables for the orchestration services.
///
/// # Examples
///
/// ```
/// use tasklane::config::OrchestrationConfig;
///
/// let config = OrchestrationConfig::default().with_resume_comment_limit(5);
/// assert_eq!(config.resume_comment_limit, 5);
/// assert_eq!(config.position_stride, 1000.0);
/// assert_eq!(config.agent_mention, "@agent");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Gap between positions appended at the bottom of a column.
    ///
    /// Deserialization rejects non-positive and non-finite values.
    #[serde(deserialize_with = "positive_stride")]
    pub position_stride: f64,
    /// Most recent comments included in a resume prompt.
    pub resume_comment_limit: usize,
    /// Working directory for resumed agents whose session names none.
    ///
    /// Falls back to the process working directory when unset.
    pub default_working_dir: Option<Utf8PathBuf>,
    /// Mention token that asks the agent to pick a task back up.
    pub agent_mention: String,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            position_stride: Position::DEFAULT_STRIDE,
            resume_comment_limit: 20,
            default_working_dir: None,
            agent_mention: AGENT_MENTION.to_owned(),
        }
    }
}

impl OrchestrationConfig {
    /// Sets the position stride. Non-positive or non-finite values keep the
    /// default.
    #[must_use]
    pub fn with_position_stride(mut self, stride: f64) -> Self {
        if is_usable_stride(stride) {
            self.position_stride = stride;
        }
        self
    }

    /// Sets how many recent comments a resume prompt carries.
    #[must_use]
    pub const fn with_resume_comment_limit(mut self, limit: usize) -> Self {
        self.resume_comment_limit = limit;
        self
    }

    /// Sets the fallback working directory for resumed agents.
    #[must_use]
    pub fn with_default_working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.default_working_dir = Some(dir.into());
        self
    }

    /// Sets the mention token that triggers a resume.
    #[must_use]
    pub fn with_agent_mention(mut self, mention: impl Into<String>) -> Self {
        self.agent_mention = mention.into();
        self
    }

    /// Returns the fallback working directory, resolving the process working
    /// directory when none is configured.
    #[must_use]
    pub fn resolve_working_dir(&self) -> Utf8PathBuf {
        self.default_working_dir.clone().unwrap_or_else(|| {
            std::env::current_dir()
                .ok()
                .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
                .unwrap_or_else(|| Utf8PathBuf::from("."))
        })
    }
}

fn positive_stride<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let stride = f64::deserialize(deserializer)?;
    if is_usable_stride(stride) {
        Ok(stride)
    } else {
        Err(D::Error::custom(format!(
            "position_stride must be positive and finite, got {stride}"
        )))
    }
}

fn is_usable_stride(stride: f64) -> bool {
    stride.is_finite() && stride > 0.0
}
