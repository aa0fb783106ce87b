//! Tag model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{now_millis, JournalId, StreamRecord, SyncStatus, UserId};
use crate::channel::Stream;

/// A unique identifier for a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(Uuid);

impl TagId {
    /// Create a new unique tag ID using UUID v7
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

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TagId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Natural key of a tag within a user's journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagKey {
    pub id: TagId,
    pub user_id: UserId,
    pub journal_id: JournalId,
}

/// A tag for organizing journal entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub user_id: UserId,
    pub journal_id: JournalId,
    /// Tag name (stored in lowercase)
    pub name: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last modification timestamp (Unix ms)
    pub modified_at: i64,
    /// Monotonic revision counter, bumped on every edit
    pub revision: i64,
    /// Pending local write, if any
    #[serde(default)]
    pub sync_status: SyncStatus,
}

impl Tag {
    /// Create a new tag with the given name
    ///
    /// The name is automatically converted to lowercase.
    #[must_use]
    pub fn new(user_id: UserId, journal_id: JournalId, name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: TagId::new(),
            user_id,
            journal_id,
            name: name.into().to_lowercase(),
            created_at: now,
            modified_at: now,
            revision: 0,
            sync_status: SyncStatus::PendingInsert,
        }
    }

    /// Rename the tag, bumping the revision.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into().to_lowercase();
        self.touch();
    }

    /// Bump the revision and refresh `modified_at`.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.modified_at = now_millis();
        if self.sync_status == SyncStatus::Synced {
            self.sync_status = SyncStatus::PendingUpdate;
        }
    }

    /// Mark the record as fully uploaded.
    pub fn mark_synced(&mut self) {
        self.sync_status = SyncStatus::Synced;
    }
}

impl StreamRecord for Tag {
    type Key = TagKey;

    const STREAM: Stream = Stream::Tags;

    fn key(&self) -> TagKey {
        TagKey {
            id: self.id,
            user_id: self.user_id,
            journal_id: self.journal_id,
        }
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn revision(&self) -> i64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new_lowercase() {
        let tag = Tag::new(UserId::new(), JournalId::new(), "Work");
        assert_eq!(tag.name, "work");
        assert_eq!(tag.revision, 0);
    }

    #[test]
    fn test_tag_id_unique() {
        let id1 = TagId::new();
        let id2 = TagId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_rename_bumps_revision() {
        let mut tag = Tag::new(UserId::new(), JournalId::new(), "work");
        tag.mark_synced();
        tag.rename("Life");
        assert_eq!(tag.name, "life");
        assert_eq!(tag.revision, 1);
        assert_eq!(tag.sync_status, SyncStatus::PendingUpdate);
    }
}
