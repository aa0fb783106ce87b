//! Change-feed event payloads.
//!
//! The transport delivers rows as JSON envelopes shaped
//! `{ "eventType": "INSERT" | "UPDATE" | "DELETE", "new": {...}, "old": {...} }`.
//! `RawChange` is that envelope verbatim; `ChangeEvent` is the decoded, typed
//! form the reconciler consumes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kind of row change carried by a feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Wire-level change notification, before the row payload is decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChange {
    #[serde(rename = "eventType")]
    pub kind: ChangeKind,
    /// Row state after the change (Insert/Update)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<serde_json::Value>,
    /// Row state before the change (Delete)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<serde_json::Value>,
}

/// A decoded change event carrying the affected record.
///
/// Insert and Update carry the row's new state; Delete carries the state the
/// row had before removal (enough to recover its natural key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent<R> {
    Insert(R),
    Update(R),
    Delete(R),
}

impl<R> ChangeEvent<R> {
    /// Kind of this event.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert(_) => ChangeKind::Insert,
            Self::Update(_) => ChangeKind::Update,
            Self::Delete(_) => ChangeKind::Delete,
        }
    }

    /// The record carried by this event.
    pub const fn record(&self) -> &R {
        match self {
            Self::Insert(record) | Self::Update(record) | Self::Delete(record) => record,
        }
    }
}

impl<R: DeserializeOwned> ChangeEvent<R> {
    /// Decode a wire envelope into a typed event.
    ///
    /// Insert/Update require the `new` payload, Delete requires `old`; a
    /// missing payload is a malformed event, not a silent no-op.
    pub fn decode(raw: RawChange) -> Result<Self> {
        match raw.kind {
            ChangeKind::Insert => Ok(Self::Insert(decode_payload(raw.new, "new", "INSERT")?)),
            ChangeKind::Update => Ok(Self::Update(decode_payload(raw.new, "new", "UPDATE")?)),
            ChangeKind::Delete => Ok(Self::Delete(decode_payload(raw.old, "old", "DELETE")?)),
        }
    }
}

fn decode_payload<R: DeserializeOwned>(
    payload: Option<serde_json::Value>,
    field: &str,
    kind: &str,
) -> Result<R> {
    let value = payload.ok_or_else(|| {
        Error::MalformedEvent(format!("{kind} event is missing its '{field}' record"))
    })?;
    Ok(serde_json::from_value(value)?)
}
