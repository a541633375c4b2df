//! Normalization of JSON-typed task fields read from storage.
//!
//! Record stores hand back `agent_session`, `history` and `blocked_by` in
//! several shapes: a native JSON value, raw JSON bytes, or a JSON document
//! stringified into a text column (sometimes nested inside a JSON string).
//! Each field has exactly one `parse_*` function here that accepts every
//! shape and returns the canonical typed value, or `None` when the field is
//! absent or malformed. Nothing outside this module inspects raw shapes.

use super::{AgentSession, HistoryEntry, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// A JSON-typed field as it arrives from a record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum RawField {
    /// Already-decoded JSON.
    Native(Value),
    /// Undecoded JSON bytes.
    Bytes(Vec<u8>),
    /// JSON text.
    Text(String),
}

impl Default for RawField {
    fn default() -> Self {
        Self::Native(Value::Null)
    }
}

impl RawField {
    /// Decodes the field into a JSON value, unwrapping stringified JSON.
    ///
    /// Returns `None` for null, blank text, and undecodable input.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        let decoded = match self {
            Self::Native(value) => value.clone(),
            Self::Bytes(bytes) => serde_json::from_slice(bytes).ok()?,
            Self::Text(text) => decode_text(text)?,
        };
        unwrap_stringified(decoded)
    }
}

fn decode_text(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

fn unwrap_stringified(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(inner) => decode_text(&inner).and_then(|nested| match nested {
            // One level only: a JSON string of a JSON string is not a record.
            Value::String(_) | Value::Null => None,
            other => Some(other),
        }),
        other => Some(other),
    }
}

/// Parses an agent session.
///
/// Null, empty strings, `{}` and sessions whose fields are all blank are
/// treated as absent.
#[must_use]
pub fn parse_agent_session(raw: &RawField) -> Option<AgentSession> {
    let value = raw.to_value()?;
    if !value.is_object() {
        return None;
    }
    let session: AgentSession = serde_json::from_value(value).ok()?;
    (!session.is_empty()).then_some(session)
}

/// Parses a history log.
///
/// Returns `None` unless the value is an array of well-formed entries.
#[must_use]
pub fn parse_history(raw: &RawField) -> Option<Vec<HistoryEntry>> {
    let value = raw.to_value()?;
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Parses a blocker set.
///
/// Accepts an array of task id strings. A single malformed id rejects the
/// whole field.
#[must_use]
pub fn parse_blocked_by(raw: &RawField) -> Option<BTreeSet<TaskId>> {
    let Value::Array(items) = raw.to_value()? else {
        return None;
    };
    items
        .iter()
        .map(|item| item.as_str().and_then(|id| id.parse::<TaskId>().ok()))
        .collect()
}
