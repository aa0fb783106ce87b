//! Data models shared by the three realtime streams.

mod day;
mod entry;
mod entry_tag;
mod tag;

pub use day::Day;
pub use entry::{Entry, EntryKey};
pub use entry_tag::{EntryTag, EntryTagKey};
pub use tag::{Tag, TagId, TagKey};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channel::Stream;

/// A unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new unique user ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A unique identifier for a journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JournalId(Uuid);

impl JournalId {
    /// Create a new unique journal ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for JournalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JournalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Pending-write marker for a locally held record.
///
/// Reflects local edits awaiting upload; deliberately NOT consulted by the
/// staleness check, which compares only `created_at` and `revision`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Synced,
    PendingInsert,
    PendingUpdate,
    PendingDelete,
}

/// The shape shared by all records flowing through a change feed.
///
/// Each of the three streams carries a record type with a natural key, a
/// creation timestamp, and a monotonic revision counter. The reconciler is
/// generic over this trait; it never inspects other fields.
pub trait StreamRecord: Clone + Send + Sync + 'static {
    /// Natural key identifying a record within its stream.
    type Key: PartialEq + Clone + fmt::Debug + Send + Sync;

    /// The stream this record type travels on.
    const STREAM: Stream;

    /// Natural key of this record.
    fn key(&self) -> Self::Key;

    /// Creation timestamp (Unix ms).
    fn created_at(&self) -> i64;

    /// Monotonic revision counter, incremented on every write.
    fn revision(&self) -> i64;
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
