//! Journal entry model

use serde::{Deserialize, Serialize};

use super::{now_millis, Day, JournalId, StreamRecord, SyncStatus, TagId, UserId};
use crate::channel::Stream;

/// Natural key of an entry: one entry per (user, day, journal, tag).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub user_id: UserId,
    pub day: Day,
    pub journal_id: JournalId,
    pub tag_id: TagId,
}

/// A per-day journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub user_id: UserId,
    pub day: Day,
    pub journal_id: JournalId,
    pub tag_id: TagId,
    /// Entry body text
    pub content: String,
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

impl Entry {
    /// Create a new entry awaiting its first upload.
    #[must_use]
    pub fn new(
        user_id: UserId,
        day: Day,
        journal_id: JournalId,
        tag_id: TagId,
        content: impl Into<String>,
    ) -> Self {
        let now = now_millis();
        Self {
            user_id,
            day,
            journal_id,
            tag_id,
            content: content.into(),
            created_at: now,
            modified_at: now,
            revision: 0,
            sync_status: SyncStatus::PendingInsert,
        }
    }

    /// Apply an edit: replace the body, bump the revision, refresh the
    /// modification timestamp.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    /// Bump the revision and refresh `modified_at` without changing content.
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

    /// Mark the record for deletion on the next upload.
    pub fn mark_deleted(&mut self) {
        self.sync_status = SyncStatus::PendingDelete;
    }

    /// Check if entry content is empty (whitespace-only counts as empty)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl StreamRecord for Entry {
    type Key = EntryKey;

    const STREAM: Stream = Stream::Entries;

    fn key(&self) -> EntryKey {
        EntryKey {
            user_id: self.user_id,
            day: self.day.clone(),
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
