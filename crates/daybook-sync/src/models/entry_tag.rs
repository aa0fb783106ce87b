//! Entry-tag association model

use serde::{Deserialize, Serialize};

use super::{now_millis, Day, JournalId, StreamRecord, SyncStatus, TagId, UserId};
use crate::channel::Stream;

/// Natural key of an entry-tag association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryTagKey {
    pub day: Day,
    pub user_id: UserId,
    pub journal_id: JournalId,
    pub tag_id: TagId,
}

/// Association between a day's entry and a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTag {
    pub day: Day,
    pub user_id: UserId,
    pub journal_id: JournalId,
    pub tag_id: TagId,
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

impl EntryTag {
    /// Create a new association awaiting its first upload.
    #[must_use]
    pub fn new(day: Day, user_id: UserId, journal_id: JournalId, tag_id: TagId) -> Self {
        let now = now_millis();
        Self {
            day,
            user_id,
            journal_id,
            tag_id,
            created_at: now,
            modified_at: now,
            revision: 0,
            sync_status: SyncStatus::PendingInsert,
        }
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

impl StreamRecord for EntryTag {
    type Key = EntryTagKey;

    const STREAM: Stream = Stream::EntryTags;

    fn key(&self) -> EntryTagKey {
        EntryTagKey {
            day: self.day.clone(),
            user_id: self.user_id,
            journal_id: self.journal_id,
            tag_id: self.tag_id,
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
    fn test_entry_tag_new() {
        let link = EntryTag::new(
            Day::new("20240101").unwrap(),
            UserId::new(),
            JournalId::new(),
            TagId::new(),
        );
        assert_eq!(link.revision, 0);
        assert_eq!(link.sync_status, SyncStatus::PendingInsert);
    }

    #[test]
    fn test_touch_after_sync_marks_pending_update() {
        let mut link = EntryTag::new(
            Day::new("20240101").unwrap(),
            UserId::new(),
            JournalId::new(),
            TagId::new(),
        );
        link.mark_synced();
        link.touch();
        assert_eq!(link.revision, 1);
        assert_eq!(link.sync_status, SyncStatus::PendingUpdate);
    }
}
